use color_eyre::eyre::{eyre, Result};
use tokio::process::Command;

/// Platform launcher for opening a URL in the default browser.
pub fn launcher(url: &str) -> (&'static str, Vec<&str>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url])
    } else if cfg!(target_os = "windows") {
        ("cmd", vec!["/C", "start", url])
    } else {
        ("xdg-open", vec![url])
    }
}

pub async fn open_in_browser(url: &str) -> Result<()> {
    let (cmd, args) = launcher(url);
    let status = Command::new(cmd)
        .args(&args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map_err(|e| eyre!("Failed to launch {cmd}: {e}"))?;
    if !status.success() {
        return Err(eyre!("{cmd} exited with {status}"));
    }
    Ok(())
}
