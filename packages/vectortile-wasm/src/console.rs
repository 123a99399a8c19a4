use wasm_bindgen::prelude::*;

// JS console bindings behind the console_log!/console_warn! macros in lib.rs.
// These panic outside a JS host, so only vectortile.rs logs.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn warn(s: &str);
}
