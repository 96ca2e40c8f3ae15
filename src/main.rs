mod config;
mod logging;
mod typing;

#[cfg(any(target_arch = "wasm32", test))]
mod page;

#[cfg(target_arch = "wasm32")]
mod frontend;
#[cfg(target_arch = "wasm32")]
mod web_loop;

#[cfg(not(target_arch = "wasm32"))]
mod runtime;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
