#![no_main]

use libfuzzer_sys::fuzz_target;
use odoo_rpc_transport::{decode_response, encode_request, Value};
use std::str;

// Fuzzer for the XML-RPC response decoder.
//
// Server responses are untrusted input: decoding any byte string must return a value or an
// error, never panic or overflow the stack. Successfully decoded values are re-encoded as
// request parameters to exercise the encoder on the same shapes.

fuzz_target!(|data: &[u8]| {
    let Ok(body) = str::from_utf8(data) else {
        return;
    };

    if let Ok(value) = decode_response(body) {
        let _ = encode_request("fuzz", &[value, Value::Nil]);
    }
});
