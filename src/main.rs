#[cfg(target_arch = "wasm32")]
pub fn main() {
    voterdesk::start();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
