//! Upload, read back and delete a file on a running hfs server.
//!
//! ```text
//! cargo run --bin hfs -- --root /tmp/share &
//! cargo run --example client_roundtrip -- hfs://localhost:3030/demo.txt
//! ```

use hfs_client::ClientError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hfs://localhost:3030/demo.txt".to_string());

    // 1. Create and write
    let mut file = hfs_client::create(&address)?;
    file.write(b"Hello from hfs!\n").await?;
    file.close()?;
    println!("Wrote {}", file.address().url());

    // 2. Open and read
    let mut file = hfs_client::open(&address)?;
    let body = file.read_to_end().await?;
    file.close()?;
    println!("Read back: {}", String::from_utf8_lossy(&body).trim_end());

    // 3. Remove, then show that a second remove is reported
    hfs_client::remove(&address).await?;
    println!("Removed {}", address);
    match hfs_client::remove(&address).await {
        Err(ClientError::NotFound { url }) => println!("Already gone: {}", url),
        other => println!("Unexpected: {:?}", other),
    }

    Ok(())
}
