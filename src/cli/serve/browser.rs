//! Open the served URL in the default browser.

use anyhow::{Context, Result, anyhow};
use std::process::{Command, Stdio};

/// A platform opener: program plus fixed leading arguments.
struct Opener {
    program: &'static str,
    args: &'static [&'static str],
}

#[cfg(target_os = "macos")]
const OPENERS: &[Opener] = &[Opener {
    program: "open",
    args: &[],
}];

#[cfg(windows)]
const OPENERS: &[Opener] = &[Opener {
    program: "cmd",
    // `start` is a shell builtin; the empty string is the window title.
    args: &["/C", "start", ""],
}];

#[cfg(not(any(target_os = "macos", windows)))]
const OPENERS: &[Opener] = &[
    Opener {
        program: "xdg-open",
        args: &[],
    },
    Opener {
        program: "gio",
        args: &["open"],
    },
];

/// Launch the browser on `url` without waiting for it.
pub fn open(url: &str) -> Result<()> {
    let (path, opener) = OPENERS
        .iter()
        .find_map(|o| which::which(o.program).ok().map(|path| (path, o)))
        .ok_or_else(|| {
            let names: Vec<_> = OPENERS.iter().map(|o| o.program).collect();
            anyhow!("no browser opener found (tried {})", names.join(", "))
        })?;

    let mut child = Command::new(&path)
        .args(opener.args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn `{}`", opener.program))?;
    std::thread::spawn(move || child.wait());

    crate::debug!("serve"; "opened {} with {}", url, path.display());
    Ok(())
}
