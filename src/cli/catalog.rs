//! Catalog listing

use anyhow::Result;
use clap::Args;

use crate::booking::Catalog;

/// Print part of the shop catalog
#[derive(Debug, Args)]
pub struct CatalogCommand {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CatalogCommand {
    pub fn masters(&self) -> Result<()> {
        let catalog = Catalog::default();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&catalog.masters)?);
        } else {
            print!("{}", format_masters(&catalog));
        }
        Ok(())
    }

    pub fn services(&self) -> Result<()> {
        let catalog = Catalog::default();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&catalog.services)?);
        } else {
            print!("{}", format_services(&catalog));
        }
        Ok(())
    }
}

fn format_masters(catalog: &Catalog) -> String {
    catalog
        .masters
        .iter()
        .map(|m| {
            format!(
                "{:>3}  {:<28} {:<32} {:<9} {}\n",
                m.id, m.name, m.specialty, m.experience, m.price_range
            )
        })
        .collect()
}

fn format_services(catalog: &Catalog) -> String {
    catalog
        .services
        .iter()
        .map(|s| format!("{:<14} {:<24} {:>8}  {}\n", s.id, s.name, s.price, s.duration))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masters_listing_shows_ids() {
        let text = format_masters(&Catalog::default());
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().next().unwrap().trim_start().starts_with("1 "));
    }

    #[test]
    fn test_services_listing_includes_ids() {
        let text = format_services(&Catalog::default());
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("haircut"));
    }
}
