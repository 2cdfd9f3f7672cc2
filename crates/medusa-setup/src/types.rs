//! Configuration types collected from the interactive prompts

/// Where the project's database lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseMode {
    /// Local PostgreSQL server (requires PostgreSQL to be installed)
    #[default]
    Local,
}

/// Per-run project configuration, immutable once cloning begins
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Slug-normalized project name, doubles as the target directory
    pub name: String,
    /// Database mode chosen at the prompt
    pub database: DatabaseMode,
}

/// Admin account handed to the framework CLI, never stored by this tool
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
}

/// Normalize a project name into a directory-safe slug
///
/// Lowercases, maps whitespace and underscores to hyphens, drops every other
/// non-alphanumeric character, and collapses runs of hyphens.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_hyphen = true;

    for c in input.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if (c.is_whitespace() || c == '-' || c == '_') && !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Check that an input looks like an email address
///
/// Not RFC 5322; the framework CLI does its own validation. This only rejects
/// obviously broken input before it reaches an external command line.
pub fn is_valid_email(input: &str) -> bool {
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !input.contains(char::is_whitespace)
        && input.matches('@').count() == 1
}
