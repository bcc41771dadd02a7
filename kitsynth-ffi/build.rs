// Regenerates the C header with `cbindgen` when the binary is installed.
// Without it, the checked-in `include/kitsynth.h` is copied to $OUT_DIR.
//
// Consumers can include the header from:
//   - <repo>/kitsynth-ffi/include/kitsynth.h   (checked-in)
//   - $OUT_DIR/kitsynth.h

use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/kitsynth.h");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let header_repo = crate_dir.join("include").join("kitsynth.h");
    let header_out = out_dir.join("kitsynth.h");

    let cbindgen_ok = Command::new("cbindgen")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    if cbindgen_ok {
        let generated = Command::new("cbindgen")
            .args(["--crate", "kitsynth-ffi", "--lang", "C", "--output"])
            .arg(&header_out)
            .current_dir(&crate_dir)
            .status()
            .map(|s| s.success())
            .unwrap_or(false);

        if generated {
            if let Some(parent) = header_repo.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::copy(&header_out, &header_repo);
            return;
        }
        println!("cargo:warning=kitsynth-ffi: cbindgen failed; using checked-in header");
    }

    if header_repo.exists() {
        fs::copy(&header_repo, &header_out).expect("copy include/kitsynth.h to OUT_DIR");
    } else {
        println!("cargo:warning=kitsynth-ffi: include/kitsynth.h missing and cbindgen unavailable");
    }
}
