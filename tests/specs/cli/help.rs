//! Version and help output specs

use crate::prelude::*;

#[test]
fn version_flag_prints_version() {
    let expected = format!("kron {}\n", env!("CARGO_PKG_VERSION"));
    cli().args(&["--version"]).passes().stdout_eq(&expected);
    cli().args(&["-v"]).passes().stdout_eq(&expected);
}

#[test]
fn help_lists_flags() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("--file <PATH>")
        .stdout_has("--json")
        .stdout_has("--test <NAME>")
        .stdout_has("--output-dir <DIR>")
        .stdout_has("--retention <POLICY>")
        .stdout_has("--log-file <PATH>");
}
