//! `bvs info` – show the configured remote.

use bvs_core::Remote;

pub fn run_info(remote: &Remote) {
    let cfg = remote.config();
    println!("{}", remote);
    println!("storage id: {}", hex::encode(remote.id()));
    println!("region:     {}", cfg.region);
    if let Some(endpoint) = &cfg.endpoint {
        println!("endpoint:   {}", endpoint);
    }
    println!("part size:  {} bytes", cfg.part_size);
}
