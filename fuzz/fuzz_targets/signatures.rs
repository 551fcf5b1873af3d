#![no_main]

use libfuzzer_sys::fuzz_target;
use classscope::metadata::signatures::{
    parse_class_signature, parse_field_descriptor, parse_method_descriptor,
    parse_method_signature, parse_type_signature,
};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(signature) = parse_class_signature(text) {
        assert_eq!(parse_class_signature(&signature.to_string()).ok(), Some(signature));
    }
    if let Ok(signature) = parse_method_signature(text) {
        assert_eq!(parse_method_signature(&signature.to_string()).ok(), Some(signature));
    }
    if let Ok(signature) = parse_type_signature(text) {
        assert_eq!(parse_type_signature(&signature.to_string()).ok(), Some(signature));
    }
    let _ = parse_field_descriptor(text);
    let _ = parse_method_descriptor(text);
});
