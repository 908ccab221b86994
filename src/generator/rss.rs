//! RSS feed of blog posts.

use crate::{
    config::SiteConfig,
    log,
    model::BlogPost,
    render::routes,
    utils::{
        date::to_rfc2822,
        minify::{MinifyType, minify},
    },
};
use anyhow::{Context, Result, anyhow};
use regex::Regex;
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::{fs, sync::LazyLock};

/// Write the feed if `[build.rss].enable` is set.
pub fn build_rss(config: &SiteConfig, posts: &[BlogPost]) -> Result<()> {
    if config.build.rss.enable {
        let xml = feed_xml(config, posts)?;
        write_feed(config, &xml)?;
    }
    Ok(())
}

fn feed_xml(config: &SiteConfig, posts: &[BlogPost]) -> Result<String> {
    let base = &config.base;
    let items: Vec<_> = posts
        .iter()
        .filter_map(|post| post_to_item(post, config))
        .collect();

    let channel = ChannelBuilder::default()
        .title(&base.title)
        .link(base.absolute(routes::BLOG))
        .description(if base.description.is_empty() {
            &base.tagline
        } else {
            &base.description
        })
        .language(base.language.clone())
        .generator("bedbug".to_owned())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("rss validation failed: {e}"))?;
    Ok(channel.to_string())
}

fn write_feed(config: &SiteConfig, xml: &str) -> Result<()> {
    let xml = minify(MinifyType::Xml, xml.as_bytes(), config.build.minify);
    let path = config.paths().output_dir().join(&config.build.rss.path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &*xml).with_context(|| format!("Failed to write {}", path.display()))?;

    log!("rss"; "{}", config.build.rss.path.display());
    Ok(())
}

/// `None` for posts whose date cannot be expressed as RFC 2822.
fn post_to_item(post: &BlogPost, config: &SiteConfig) -> Option<rss::Item> {
    let pub_date = to_rfc2822(&post.date)?;
    let link = config.base.absolute(&routes::post(&post.id));

    Some(
        ItemBuilder::default()
            .title(post.title.clone())
            .link(link.clone())
            .guid(GuidBuilder::default().permalink(true).value(link).build())
            .description(post.excerpt.clone())
            .pub_date(pub_date)
            .author(rss_author(&post.author, config))
            .categories(vec![CategoryBuilder::default().name(post.category.clone()).build()])
            .build(),
    )
}

/// RSS wants `email (Name)`; fall back to the site contact when the post has none.
fn rss_author(author: &str, config: &SiteConfig) -> String {
    static RE_RSS_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });

    if RE_RSS_AUTHOR.is_match(author) {
        author.to_owned()
    } else {
        format!("{} ({author})", config.base.email)
    }
}
