#![no_main]

use libfuzzer_sys::fuzz_target;
use classscope::{ClassDefinition, FieldDefinition, Library, MemoryProvider, MethodDefinition};

// Splits the input into a class signature, a field signature and a method signature
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = text.splitn(3, '\n');
    let class = parts.next().unwrap_or_default();
    let field = parts.next().unwrap_or_default();
    let method = parts.next().unwrap_or_default();

    let provider = MemoryProvider::with_core_classes().define(
        ClassDefinition::class("fuzz/Target")
            .signature(class)
            .field(FieldDefinition::new("value", "Ljava/lang/Object;").signature(field))
            .method(MethodDefinition::new("run", "(Ljava/lang/Object;)V").signature(method)),
    );
    let library = Library::new(provider);

    if let Ok(id) = library.get_type("fuzz/Target") {
        let _ = library.fields(id);
        let _ = library.methods(id);
        if let Ok(raw) = library.get_raw_type(id) {
            let _ = library.methods(raw);
        }
        let _ = library.supertypes(id);
    }
});
