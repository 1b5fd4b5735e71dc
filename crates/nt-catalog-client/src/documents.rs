//! Typed, tolerant representations of the upstream catalog's JSON documents.
//!
//! Every struct derives `Default` and marks every field `#[serde(default)]`
//! so an upstream field addition or removal never breaks parsing; only the
//! fields this system actually needs are modeled.

use chrono::{DateTime, Utc};
use nt_types::{DependencyGroup, PackageLeaf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The service index: a small document advertising named resources, one of
/// which is the catalog's root (`@id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceIndexDoc {
    #[serde(default)]
    pub resources: Vec<ServiceResource>,
}

impl ServiceIndexDoc {
    /// Find a resource whose `@type` matches `resource_type` exactly or as
    /// a versioned prefix (`Catalog/3.0.0` etc).
    #[must_use]
    pub fn resource_url(&self, resource_type: &str) -> Option<&str> {
        self.resources
            .iter()
            .find(|r| r.kind == resource_type || r.kind.starts_with(resource_type))
            .map(|r| r.id.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceResource {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "@type", default)]
    pub kind: String,
}

/// The catalog index: a list of page references, each spanning a
/// `[commit_min, commit_max]` window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogIndexDoc {
    #[serde(default)]
    pub items: Vec<CatalogPageRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPageRef {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "commitTimeStamp", default = "epoch")]
    pub commit_timestamp: DateTime<Utc>,
    #[serde(rename = "count", default)]
    pub count: u64,
}

/// A single catalog page: a list of leaf references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPageDoc {
    #[serde(default)]
    pub items: Vec<LeafRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeafRef {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "@type", default)]
    pub kind: Vec<String>,
    #[serde(rename = "commitTimeStamp", default = "epoch")]
    pub commit_timestamp: DateTime<Utc>,
    #[serde(rename = "nuget:id", default)]
    pub package_id: String,
    #[serde(rename = "nuget:version", default)]
    pub package_version: String,
}

/// A single catalog leaf: either a `PackageDetails` document or a
/// `PackageDelete` tombstone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogLeafDoc {
    #[serde(rename = "@type", default)]
    pub kind: Vec<String>,
    #[serde(rename = "commitTimeStamp", default = "epoch")]
    pub commit_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default = "epoch")]
    pub published: DateTime<Utc>,
    #[serde(default)]
    pub listed: Option<bool>,
    #[serde(rename = "iconUrl", default)]
    pub icon_url: Option<String>,
    #[serde(rename = "projectUrl", default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(rename = "dependencyGroups", default)]
    pub dependency_groups: Vec<RawDependencyGroup>,
}

impl CatalogLeafDoc {
    /// Convert a `PackageDetails` leaf into the normalized metadata row.
    ///
    /// # Panics
    ///
    /// Never: this is infallible once the caller has already classified the
    /// leaf as `PackageDetails` via [`crate::CatalogLeafDoc::leaf_kind`].
    #[must_use]
    pub fn into_package_leaf(self) -> PackageLeaf {
        let target_frameworks = self
            .dependency_groups
            .iter()
            .filter_map(|g| g.target_framework.clone())
            .collect::<BTreeSet<_>>();

        PackageLeaf {
            package_id: self.id.clone(),
            package_id_lower: self.id.to_lowercase(),
            package_version: self.version,
            commit_timestamp: self.commit_timestamp,
            published: self.published,
            listed: self.listed,
            icon_url: self.icon_url,
            project_url: self.project_url,
            description: self.description,
            tags: self.tags.0,
            authors: self.authors,
            target_frameworks,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDependencyGroup {
    #[serde(rename = "targetFramework", default)]
    pub target_framework: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<RawDependency>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDependency {
    #[serde(default)]
    pub id: String,
}

impl From<RawDependencyGroup> for DependencyGroup {
    fn from(raw: RawDependencyGroup) -> Self {
        DependencyGroup {
            target_framework: raw.target_framework,
            dependency_ids: raw.dependencies.into_iter().map(|d| d.id).collect(),
        }
    }
}

/// NuGet's catalog encodes `tags` as either a JSON array or a single
/// space-delimited string, depending on how many tags a package has.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagList(pub BTreeSet<String>);

impl<'de> Deserialize<'de> for TagList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }

        let repr = Option::<Repr>::deserialize(deserializer)?;
        let set = match repr {
            None => BTreeSet::new(),
            Some(Repr::One(s)) => s.split_whitespace().map(str::to_string).collect(),
            Some(Repr::Many(v)) => v.into_iter().collect(),
        };
        Ok(TagList(set))
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(0, 0).unwrap_or_else(Utc::now)
}
