//! `init` command: write a starter config.toml

use super::Context;
use crate::address::parse_address;
use crate::error::{Result, TodoError};
use crate::storage::config::{self, Config};
use crate::storage::ensure_data_dir;

/// Write config.toml with the given accounts. Refuses to overwrite unless
/// `force` is set.
pub fn execute(ctx: &Context, known: Vec<String>, force: bool) -> Result<()> {
    let path = config::config_path(&ctx.data_dir);
    if path.exists() && !force {
        return Err(TodoError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let mut new_config = Config::default();
    if let Some(raw) = &ctx.account {
        new_config.accounts.default = Some(parse_address(raw)?.to_string());
    }
    for raw in known {
        new_config.accounts.known.push(parse_address(&raw)?.to_string());
    }

    ensure_data_dir(&ctx.data_dir)?;
    config::save_config(&ctx.data_dir, &new_config)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x90F8bf6A479f320ead074411a4B0e7944Ea8c9C1";
    const BOB: &str = "0xffcf8fdee72ac11b5c542428b35eef5769c409f0";

    #[test]
    fn test_init_writes_normalised_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            data_dir: dir.path().join("home"),
            config: Config::default(),
            account: Some(ALICE.to_string()),
        };

        execute(&ctx, vec![BOB.to_string()], false).unwrap();
        let written = config::load_config(&ctx.data_dir).unwrap();
        assert_eq!(written.accounts.default.as_deref(), Some(ALICE.to_lowercase().as_str()));
        assert_eq!(written.accounts.known, vec![BOB.to_string()]);

        assert!(matches!(
            execute(&ctx, Vec::new(), false),
            Err(TodoError::Config(_))
        ));
        assert!(execute(&ctx, Vec::new(), true).is_ok());
    }

    #[test]
    fn test_init_rejects_bad_address() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            data_dir: dir.path().to_path_buf(),
            config: Config::default(),
            account: None,
        };
        assert!(execute(&ctx, vec!["0xnope".to_string()], false).is_err());
        assert!(!config::config_path(dir.path()).exists());
    }
}
