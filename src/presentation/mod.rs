pub mod view_model;
pub mod wasm_api;
