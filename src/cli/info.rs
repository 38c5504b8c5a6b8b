use std::path::Path;

use tabled::Table;

use crate::{Result, management::AccountCache, report::Reporter, types::AccountTableRow};

pub async fn info(cache_dir: &Path, reporter: &dyn Reporter) -> Result<()> {
    let records = AccountCache::load_all(cache_dir).await?;

    if records.is_empty() {
        reporter.info(&format!(
            "No cached accounts in {}. Run fanfeed run first.",
            cache_dir.display()
        ));
        return Ok(());
    }

    let rows: Vec<AccountTableRow> = records.iter().map(AccountTableRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}
