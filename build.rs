use std::{
    env,
    path::{Path, PathBuf},
    process::Command,
};

const VARIANT_FILE: &str = "test-dylib/variant.rs";

fn variant_file_name(target_os: &str) -> &'static str {
    match target_os {
        "macos" | "ios" => "libvariant.dylib",
        _ => "libvariant.so",
    }
}

fn compile_variant(target: &str, out_dir: &Path) -> Result<PathBuf, String> {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let mut cmd = Command::new(rustc);
    cmd.arg("-O")
        .arg("--edition")
        .arg("2021")
        .arg("--target")
        .arg(target)
        .arg("-C")
        .arg("panic=abort")
        .arg(VARIANT_FILE)
        .arg("--out-dir")
        .arg(out_dir);
    let status = cmd
        .status()
        .map_err(|err| format!("could not run rustc: {err}"))?;
    if !status.success() {
        return Err(format!("rustc exited with {status}"));
    }
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    Ok(out_dir.join(variant_file_name(&target_os)))
}

fn main() {
    println!("cargo:rerun-if-env-changed=PRELOAD_BRIDGE_ENV");
    println!("cargo:rerun-if-changed={VARIANT_FILE}");

    // The fixture is only loadable by tests running on the build host.
    let target = env::var("TARGET").unwrap_or_default();
    let host = env::var("HOST").unwrap_or_default();
    if env::var_os("CARGO_CFG_UNIX").is_none() || target != host {
        return;
    }
    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    match compile_variant(&target, &out_dir) {
        Ok(path) => println!(
            "cargo:rustc-env=PRELOAD_BRIDGE_TEST_ARTIFACTS={}",
            path.display()
        ),
        Err(msg) => println!("cargo:warning=test fixture not built, load tests will skip: {msg}"),
    }
}
