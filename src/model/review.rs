//! Visitor reviews kept only in local view state.

use thiserror::Error;

/// A review typed in during a single preview session. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReview {
    /// 1..=5
    pub rating: u8,
    pub author: String,
    pub comment: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("rating must be between 1 and 5, got {0}")]
    Rating(u8),

    #[error("review author is empty")]
    EmptyAuthor,

    #[error("review comment is empty")]
    EmptyComment,

    #[error("invalid review `{0}`, expected `RATING|AUTHOR|COMMENT`")]
    Syntax(String),
}

impl UserReview {
    /// Build a validated review. Author and comment are trimmed.
    pub fn new(rating: u8, author: &str, comment: &str) -> Result<Self, ReviewError> {
        if !(1..=5).contains(&rating) {
            return Err(ReviewError::Rating(rating));
        }
        let author = author.trim();
        if author.is_empty() {
            return Err(ReviewError::EmptyAuthor);
        }
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(ReviewError::EmptyComment);
        }
        Ok(Self {
            rating,
            author: author.to_owned(),
            comment: comment.to_owned(),
        })
    }

    /// Split the CLI form `RATING|AUTHOR|COMMENT`. Values are not validated yet.
    pub fn split_cli(spec: &str) -> Result<(u8, &str, &str), ReviewError> {
        let mut parts = spec.splitn(3, '|');
        let (Some(rating), Some(author), Some(comment)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ReviewError::Syntax(spec.to_owned()));
        };
        let rating: u8 = rating
            .trim()
            .parse()
            .map_err(|_| ReviewError::Syntax(spec.to_owned()))?;
        Ok((rating, author, comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_rating() {
        assert_eq!(UserReview::new(0, "a", "b"), Err(ReviewError::Rating(0)));
        assert_eq!(UserReview::new(6, "a", "b"), Err(ReviewError::Rating(6)));
        assert!(UserReview::new(1, "a", "b").is_ok());
        assert!(UserReview::new(5, "a", "b").is_ok());
    }

    #[test]
    fn test_new_rejects_blank_text() {
        assert_eq!(UserReview::new(3, "  ", "b"), Err(ReviewError::EmptyAuthor));
        assert_eq!(UserReview::new(3, "a", ""), Err(ReviewError::EmptyComment));
    }

    #[test]
    fn test_split_cli() {
        let (rating, author, comment) = UserReview::split_cli("4| Alice |Clean sheets|no bugs").unwrap();
        assert_eq!(rating, 4);
        assert_eq!(author, " Alice ");
        // Only the first two separators split
        assert_eq!(comment, "Clean sheets|no bugs");

        let review = UserReview::new(rating, author, comment).unwrap();
        assert_eq!(review.author, "Alice");
    }

    #[test]
    fn test_split_cli_errors() {
        assert!(matches!(
            UserReview::split_cli("great stay"),
            Err(ReviewError::Syntax(_))
        ));
        assert!(matches!(
            UserReview::split_cli("five|Bob|ok"),
            Err(ReviewError::Syntax(_))
        ));
        // Range checks happen in `new`
        assert_eq!(UserReview::split_cli("9|Bob|ok"), Ok((9, "Bob", "ok")));
    }
}
