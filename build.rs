use std::path::Path;
extern crate rustsourcebundler;
use rustsourcebundler::Bundler;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("bundle")?;
    let mut bundler: Bundler =
        Bundler::new(Path::new("src/bin/main.rs"), Path::new("bundle/podracer.rs"));
    bundler.crate_name("podracer");
    bundler.run();
    Ok(())
}
