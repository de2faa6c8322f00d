#![no_main]

use libfuzzer_sys::fuzz_target;
use tarn::{lexer, parser};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(tokens) = lexer::lex(source) else {
        return;
    };
    if let Ok(module) = parser::parse(&tokens) {
        // Rendering walks every node
        let _ = module.to_string();
    }
});
