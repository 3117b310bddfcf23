//! Example: Discover the client and print its PID and API port.

use scport_core::discover;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match discover(false).await {
        Ok(info) if info.is_running() => println!("{}", info),
        Ok(_) => println!("StarCraft is not running."),
        Err(e) => eprintln!("Error: {}", e),
    }
}
