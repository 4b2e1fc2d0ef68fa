//! Blogs command - list blogs known to the directory

use anyhow::{anyhow, bail, Result};
use console::style;
use std::path::Path;

use super::{airtable_store, load_configs, shared};
use crate::blogs::BlogDirectory;
use crate::models::BlogConfig;

pub fn run(
    config_path: Option<&Path>,
    json: bool,
    domain: Option<&str>,
    agency: Option<&str>,
) -> Result<()> {
    let (user, project) = load_configs(config_path)?;
    let directory = BlogDirectory::new(shared(airtable_store(&user)), &project);
    let blogs = select_blogs(&directory, domain, agency)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&blogs)?);
        return Ok(());
    }

    if blogs.is_empty() {
        println!("No blogs configured.");
        println!(
            "{}",
            style("Add [[blogs]] to blogforge.toml or set AIRTABLE_API_KEY and AIRTABLE_BASE_ID.").dim()
        );
        return Ok(());
    }

    print!("{}", render_table(&blogs));
    Ok(())
}

/// Blogs for a host, for an agency, or all of them
fn select_blogs(
    directory: &BlogDirectory,
    domain: Option<&str>,
    agency: Option<&str>,
) -> Result<Vec<BlogConfig>> {
    if let Some(host) = domain {
        let blog = directory
            .by_domain(host)
            .ok_or_else(|| anyhow!("No blogs configured"))?;
        return Ok(vec![blog]);
    }
    if let Some(agency_id) = agency {
        if !directory.agencies(false).iter().any(|a| a.id == agency_id) {
            bail!("Agency ID '{}' not found", agency_id);
        }
        return Ok(directory.agency_blogs(agency_id));
    }
    Ok(directory.blogs(false))
}

fn render_table(blogs: &[BlogConfig]) -> String {
    let mut out = format!(
        "{}\n",
        style(format!("{:<20} {:<28} {:<28} {}", "ID", "NAME", "DOMAIN", "POSTS TABLE")).bold()
    );
    for blog in blogs {
        out.push_str(&format!(
            "{:<20} {:<28} {:<28} {}\n",
            blog.id, blog.name, blog.domain, blog.posts_table
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::store::{EntityStore, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_select_blogs_for_agency() {
        let store = Arc::new(MemoryStore::new());
        let fields = |v: serde_json::Value| v.as_object().cloned().unwrap();
        let tech = store
            .create("Blogs", fields(json!({"Name": "Tech", "Domain": "tech.example.com"})))
            .unwrap();
        store
            .create("Blogs", fields(json!({"Name": "Food", "Domain": "food.example.com"})))
            .unwrap();
        let acme = store
            .create("Agencies", fields(json!({"Name": "Acme", "Blogs": [tech.0.clone()]})))
            .unwrap();

        let directory = BlogDirectory::new(Some(store), &ProjectConfig::default());
        let blogs = select_blogs(&directory, None, Some(&acme.0)).unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].name, "Tech");

        assert_eq!(select_blogs(&directory, None, None).unwrap().len(), 2);
        let err = select_blogs(&directory, None, Some("recNope")).unwrap_err();
        assert!(err.to_string().contains("Agency ID 'recNope' not found"));
        let by_host = select_blogs(&directory, Some("food.example.com:443"), None).unwrap();
        assert_eq!(by_host[0].name, "Food");
    }

    #[test]
    fn test_render_table() {
        let blogs = vec![
            BlogConfig::new("tech", "Tech Notes", "tech.example.com"),
            BlogConfig::new("food", "Food", "localhost"),
        ];
        let out = render_table(&blogs);
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("tech.example.com"));
        assert!(out.lines().nth(2).unwrap().starts_with("food"));
    }
}
