//! Share surface - clipboard hand-off with stdout fallback

use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, info};

const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
];

/// Hand a share summary to the platform clipboard, printing it as a
/// fallback. Clipboard failures are logged only; there is no user-visible
/// error state.
pub fn share(text: &str) {
    if copy_to_clipboard(text) {
        info!("Calculation summary copied to clipboard");
    } else {
        debug!("No clipboard utility available, printing summary");
    }
    println!("{}", text);
}

fn copy_to_clipboard(text: &str) -> bool {
    for (program, args) in CLIPBOARD_COMMANDS {
        let spawned = Command::new(program)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(_) => continue,
        };

        if let Some(stdin) = child.stdin.as_mut() {
            if stdin.write_all(text.as_bytes()).is_err() {
                continue;
            }
        }
        drop(child.stdin.take());

        match child.wait() {
            Ok(status) if status.success() => return true,
            Ok(status) => debug!("{} exited with {}", program, status),
            Err(e) => debug!("{} failed: {}", program, e),
        }
    }
    false
}
