use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=ROCM_PATH");
    println!("cargo:rerun-if-changed=build.rs");

    // Host-only builds never touch the HIP libraries
    if env::var_os("CARGO_FEATURE_ROCM").is_none() {
        return;
    }

    let rocm_root = env::var("ROCM_PATH").unwrap_or_else(|_| "/opt/rocm".to_string());
    let lib_dir = format!("{}/lib", rocm_root);

    if !std::path::Path::new(&lib_dir).exists() {
        println!(
            "cargo:warning=ROCm libraries not found at {}. Set ROCM_PATH to link amdhip64.",
            lib_dir
        );
    }

    println!("cargo:rustc-link-search=native={}", lib_dir);
    println!("cargo:rustc-link-lib=dylib=amdhip64");
}
