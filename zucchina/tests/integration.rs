use std::path::Path;
use std::process::{Command, Output};

fn zucchina(args: &[&str]) -> Output {
    let bin_path = env!("CARGO_BIN_EXE_zucchina");
    Command::new(bin_path)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run zucchina")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_encode_decode() {
    let encoded = zucchina(&["encode", "hello"]);
    assert!(encoded.status.success());
    assert_eq!(stdout(&encoded), "Cn8eVZg\n");

    let decoded = zucchina(&["decode", "Cn8eVZg"]);
    assert!(decoded.status.success());
    assert_eq!(stdout(&decoded), "hello\n");
}

#[test]
fn test_decode_rejects_invalid_token() {
    let output = zucchina(&["decode", "0OIl"]);
    assert!(!output.status.success());
}

#[test]
fn test_render_local_source() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let rules = write(tmp_dir.path(), "cn.list", "DOMAIN-SUFFIX,cn\nIP-CIDR,1.0.1.0/24,no-resolve\n");
    let source = write(
        tmp_dir.path(),
        "main.conf",
        &format!("[General]\nloglevel = notify\n[Rule]\nRULE-SET,{rules},DIRECT\nFINAL,Proxy\n"),
    );

    let output = zucchina(&["render", &source, "--url", "https://s.example.com/abc"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "#!MANAGED-CONFIG https://s.example.com/abc interval=86400 strict=false\n\
         [General]\n\
         loglevel = notify\n\
         \n\
         [Proxy]\n\
         \n\
         [Proxy Group]\n\
         \n\
         [Rule]\n\
         DOMAIN-SUFFIX,cn,DIRECT\n\
         IP-CIDR,1.0.1.0/24,DIRECT,no-resolve\n\
         FINAL,Proxy\n\
         \n\
         [URL Rewrite]\n\
         \n\
         [Header Rewrite]\n\
         \n"
    );
}

#[test]
fn test_render_missing_source_fails() {
    let output = zucchina(&["render", "/nonexistent/zucchina/main.conf"]);
    assert!(!output.status.success());
}

#[test]
fn test_validate_counts_sections() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let source = write(
        tmp_dir.path(),
        "main.conf",
        "[General]\nloglevel = notify\n[Rule]\nDOMAIN,a.com,DIRECT\nFINAL,DIRECT\n",
    );

    let output = zucchina(&["validate", &source]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("[General] 1 entries"));
    assert!(text.contains("[Rule] 2 entries"));
}
