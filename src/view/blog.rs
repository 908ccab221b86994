//! Blog listing with a category filter.

use crate::model::BlogPost;
use crate::utils::slug::slugify;
use std::fmt;

/// Slug used when a category name has no ASCII-representable characters.
const FALLBACK_CATEGORY_SLUG: &str = "uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Named(name) => name,
        }
    }

    /// URL segment under `/blog/category/`. `None` for [`CategoryFilter::All`].
    pub fn slug(&self) -> Option<String> {
        match self {
            Self::All => None,
            Self::Named(name) => Some(category_slug(name)),
        }
    }

    #[inline]
    pub fn matches(&self, post: &BlogPost) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => post.category == *name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn category_slug(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        FALLBACK_CATEGORY_SLUG.to_owned()
    } else {
        slug
    }
}

/// Posts sorted newest first, plus the category list derived from them.
#[derive(Debug, Clone, Default)]
pub struct BlogIndex {
    posts: Vec<BlogPost>,
    categories: Vec<CategoryFilter>,
}

impl BlogIndex {
    pub fn new(mut posts: Vec<BlogPost>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        let mut categories = vec![CategoryFilter::All];
        for post in &posts {
            let category = CategoryFilter::Named(post.category.clone());
            if !categories.contains(&category) {
                categories.push(category);
            }
        }

        Self { posts, categories }
    }

    /// Every post, newest first.
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    /// `All` followed by each category in first-appearance order.
    pub fn categories(&self) -> &[CategoryFilter] {
        &self.categories
    }

    pub fn filter(&self, category: &CategoryFilter) -> Vec<&BlogPost> {
        self.posts.iter().filter(|p| category.matches(p)).collect()
    }
}
