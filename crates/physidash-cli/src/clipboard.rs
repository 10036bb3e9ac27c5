//! Clipboard access via platform tools
//!
//! Pipes text to the system clipboard tool so the TUI can offer
//! copy-as-JSON without a native clipboard dependency.

/// Copy text to clipboard (platform-specific)
pub fn copy_to_clipboard(text: &str) -> bool {
    #[cfg(target_os = "linux")]
    {
        // Try xclip first, then xsel
        for cmd in &["xclip", "xsel"] {
            let args = if *cmd == "xclip" {
                vec!["-selection", "clipboard"]
            } else {
                vec!["--clipboard", "--input"]
            };

            if pipe_to(cmd, &args, text) {
                return true;
            }
        }
        false
    }

    #[cfg(target_os = "macos")]
    {
        pipe_to("pbcopy", &[], text)
    }

    #[cfg(target_os = "windows")]
    {
        pipe_to("clip", &[], text)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        let _ = text;
        false
    }
}

#[allow(dead_code)]
fn pipe_to(cmd: &str, args: &[&str], text: &str) -> bool {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let Ok(mut child) = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    else {
        return false;
    };

    if let Some(mut stdin) = child.stdin.take() {
        if stdin.write_all(text.as_bytes()).is_ok() {
            let _ = stdin.flush();
            drop(stdin);
            return child.wait().map(|s| s.success()).unwrap_or(false);
        }
    }

    false
}
