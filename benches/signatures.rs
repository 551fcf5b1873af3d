//! Benchmarks for signature parsing.
//!
//! Tests parsing performance for the JVM signature grammar:
//! - Field descriptors (primitives, classes, arrays)
//! - Method descriptors
//! - Generic type signatures with nested arguments and wildcards
//! - Class and method signatures with formal type parameters

extern crate classscope;

use classscope::metadata::signatures::{
    parse_class_signature, parse_field_descriptor, parse_method_descriptor,
    parse_method_signature, parse_type_signature,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Benchmark a primitive field descriptor.
/// Descriptor: I
fn bench_field_descriptor_primitive(c: &mut Criterion) {
    c.bench_function("desc_field_primitive", |b| {
        b.iter(|| {
            let sig = parse_field_descriptor(black_box("I")).unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark a two-dimensional array of a class.
/// Descriptor: [[Ljava/lang/String;
fn bench_field_descriptor_array(c: &mut Criterion) {
    c.bench_function("desc_field_array", |b| {
        b.iter(|| {
            let sig = parse_field_descriptor(black_box("[[Ljava/lang/String;")).unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark a method descriptor with mixed parameters.
/// Descriptor: (ILjava/lang/String;[JZ)Ljava/lang/Object;
fn bench_method_descriptor(c: &mut Criterion) {
    c.bench_function("desc_method_mixed", |b| {
        b.iter(|| {
            let sig =
                parse_method_descriptor(black_box("(ILjava/lang/String;[JZ)Ljava/lang/Object;"))
                    .unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark a generic type with a single argument.
/// Signature: List<String>
fn bench_type_signature_generic(c: &mut Criterion) {
    c.bench_function("sig_type_generic", |b| {
        b.iter(|| {
            let sig =
                parse_type_signature(black_box("Ljava/util/List<Ljava/lang/String;>;")).unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark nested generic arguments with wildcards.
/// Signature: Map<? extends K, List<? super V[]>>
fn bench_type_signature_nested(c: &mut Criterion) {
    let signature = "Ljava/util/Map<+TK;Ljava/util/List<-[TV;>;>;";

    c.bench_function("sig_type_nested", |b| {
        b.iter(|| {
            let sig = parse_type_signature(black_box(signature)).unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark an inner class of a parameterized outer class.
/// Signature: Outer<String>.Inner<Integer>
fn bench_type_signature_inner(c: &mut Criterion) {
    let signature = "Lapp/Outer<Ljava/lang/String;>.Inner<Ljava/lang/Integer;>;";

    c.bench_function("sig_type_inner", |b| {
        b.iter(|| {
            let sig = parse_type_signature(black_box(signature)).unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark a class signature shaped like `HashMap`.
fn bench_class_signature(c: &mut Criterion) {
    let signature = "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/util/AbstractMap<TK;TV;>;Ljava/util/Map<TK;TV;>;Ljava/lang/Cloneable;Ljava/io/Serializable;";

    c.bench_function("sig_class_hashmap", |b| {
        b.iter(|| {
            let sig = parse_class_signature(black_box(signature)).unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark a class signature with recursive, interface-only bounds.
fn bench_class_signature_recursive_bounds(c: &mut Criterion) {
    let signature = "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;";

    c.bench_function("sig_class_enum", |b| {
        b.iter(|| {
            let sig = parse_class_signature(black_box(signature)).unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark a generic method with bounds and a throws clause.
/// Signature: <T extends Comparable<? super T>> T max(Collection<? extends T>) throws X
fn bench_method_signature_generic(c: &mut Criterion) {
    let signature = "<T:Ljava/lang/Object;:Ljava/lang/Comparable<-TT;>;>(Ljava/util/Collection<+TT;>;)TT;^Ljava/io/IOException;";

    c.bench_function("sig_method_generic", |b| {
        b.iter(|| {
            let sig = parse_method_signature(black_box(signature)).unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark a method signature with many parameters.
fn bench_method_signature_many_params(c: &mut Criterion) {
    let signature = "(IJFDZBCSLjava/lang/String;[ILjava/util/List<Ljava/lang/String;>;)V";

    c.bench_function("sig_method_many_params", |b| {
        b.iter(|| {
            let sig = parse_method_signature(black_box(signature)).unwrap();
            black_box(sig)
        });
    });
}

criterion_group!(
    benches,
    // Descriptors
    bench_field_descriptor_primitive,
    bench_field_descriptor_array,
    bench_method_descriptor,
    // Type signatures
    bench_type_signature_generic,
    bench_type_signature_nested,
    bench_type_signature_inner,
    // Class signatures
    bench_class_signature,
    bench_class_signature_recursive_bounds,
    // Method signatures
    bench_method_signature_generic,
    bench_method_signature_many_params,
);
criterion_main!(benches);
