//! `WALLET=SOL` drop targets from the command line.

use anyhow::{anyhow, Context};
use devdrop_types::{Account, DropAccount, DropBatch};

/// Parse one `WALLET=SOL` argument.
pub fn parse_target(arg: &str) -> anyhow::Result<DropAccount> {
    let (wallet, amount) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected WALLET=SOL, got {arg:?}"))?;
    let wallet: Account = wallet.parse()?;
    let sol: f64 = amount
        .trim()
        .parse()
        .with_context(|| format!("invalid SOL amount {amount:?}"))?;
    Ok(DropAccount::from_sol(wallet, sol)?)
}

pub fn parse_batch(args: &[String]) -> anyhow::Result<DropBatch> {
    let targets = args
        .iter()
        .map(|arg| parse_target(arg))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(DropBatch::new(targets)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devdrop_types::LAMPORTS_PER_SOL;

    fn wallet(seed: u8) -> String {
        Account::from_public_key(&[seed; 32]).to_string()
    }

    #[test]
    fn parses_fractional_sol() {
        let target = parse_target(&format!("{}=0.5", wallet(1))).unwrap();
        assert_eq!(target.drop, LAMPORTS_PER_SOL / 2);
    }

    #[test]
    fn rejects_missing_amount() {
        assert!(parse_target(&wallet(1)).is_err());
        assert!(parse_target(&format!("{}=lots", wallet(1))).is_err());
        assert!(parse_target(&format!("{}=-1", wallet(1))).is_err());
    }

    #[test]
    fn batch_rejects_repeated_wallet() {
        let args = vec![format!("{}=1", wallet(1)), format!("{}=2", wallet(1))];
        assert!(parse_batch(&args).is_err());
    }

    #[test]
    fn batch_keeps_order() {
        let args = vec![format!("{}=1", wallet(2)), format!("{}=2", wallet(1))];
        let batch = parse_batch(&args).unwrap();
        assert_eq!(batch.targets()[0].wallet.to_string(), wallet(2));
        assert_eq!(batch.total().unwrap(), 3 * LAMPORTS_PER_SOL);
    }
}
