use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn protocol_version(cargo_toml: &Path) -> String {
    fs::read_to_string(cargo_toml)
        .ok()
        .and_then(|content| content.parse::<toml::Table>().ok())
        .and_then(|manifest| {
            manifest
                .get("package")?
                .get("metadata")?
                .get("telemetry_protocol_version")?
                .as_integer()
        })
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();

    let generated = format!(
        "pub const TELEMETRY_PROTOCOL_VERSION: &str = \"{}\";\n\
         pub const BUILD_TIME: &str = \"{}\";\n\
         pub const GIT_HASH: &str = \"{}\";\n",
        protocol_version(&Path::new(&manifest_dir).join("Cargo.toml")),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        git_hash()
    );
    fs::write(Path::new(&out_dir).join("version.rs"), generated).unwrap();

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
