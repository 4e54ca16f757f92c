use anyhow::{Context, Result};
use passbook_ingest::StatementLayout;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn passbook_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".passbook"))
}

pub fn layout_path() -> Result<PathBuf> {
    Ok(passbook_home()?.join("layout.toml"))
}

/// Load the layout from `explicit`, else ~/.passbook/layout.toml, else built-in defaults.
pub fn load_layout(explicit: Option<&Path>) -> Result<StatementLayout> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = layout_path()?;
            if !p.exists() {
                debug!("no layout file, using defaults");
                return Ok(StatementLayout::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let layout = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    debug!(path = %p.display(), "loaded layout");
    Ok(layout)
}

pub fn save_layout(path: &Path, layout: &StatementLayout) -> Result<()> {
    let s = toml::to_string_pretty(layout).context("serialize layout")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the default layout unless a file already exists.
pub fn init_layout(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let dir = passbook_home()?;
            fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
            dir.join("layout.toml")
        }
    };
    if p.exists() {
        println!("Layout already exists: {}", p.display());
        return Ok(());
    }
    save_layout(&p, &StatementLayout::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
