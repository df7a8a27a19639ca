//! Fixed department reference data.

use serde::Serialize;

/// Upstream identifier that returns every department at once.
pub const ALL_DEPARTMENTS_ID: u32 = 0;

/// An academic department of the university.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Department {
    /// Display name
    pub name: &'static str,
    /// Stable lookup key, also the cache key
    pub slug: &'static str,
    /// Upstream numeric identifier
    pub id: u32,
}

pub const DEPARTMENTS: &[Department] = &[
    Department {
        name: "Félagsvísindasvið",
        slug: "felagsvisindasvid",
        id: 1,
    },
    Department {
        name: "Heilbrigðisvísindasvið",
        slug: "heilbrigdisvisindasvid",
        id: 2,
    },
    Department {
        name: "Hugvísindasvið",
        slug: "hugvisindasvid",
        id: 3,
    },
    Department {
        name: "Menntavísindasvið",
        slug: "menntavisindasvid",
        id: 4,
    },
    Department {
        name: "Verkfræði- og náttúruvísindasvið",
        slug: "verkfraedi-og-natturuvisindasvid",
        id: 5,
    },
];

/// Looks a department up by slug.
pub fn find(slug: &str) -> Option<&'static Department> {
    DEPARTMENTS.iter().find(|department| department.slug == slug)
}
