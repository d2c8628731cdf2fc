// crates/dirsift-core/src/model.rs
use crate::traits::Searchable;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Position of an item in its [`Dataset`]. Results and index buckets hold
/// these instead of references.
pub type ItemId = u32;

/// A plan block attached to an organization. Only the summary is searched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "lenient_summary")]
    pub summary: Option<String>,
}

/// One directory entry as it comes from `companies.json`.
///
/// Every field is optional in the source; absent or `null` values read as
/// empty so all predicates stay total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "company_name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(rename = "company_wide_plan", default, deserialize_with = "lenient_plan")]
    pub company_plan: Option<Plan>,
    #[serde(rename = "ev_prime_plan", default, deserialize_with = "lenient_plan")]
    pub program_plan: Option<Plan>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
}

impl Organization {
    pub fn new(name: impl Into<String>, tags: &[&str]) -> Self {
        Self {
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    /// First available summary: company-wide plan, then program plan.
    pub fn summary(&self) -> Option<&str> {
        plan_summary(&self.company_plan).or_else(|| plan_summary(&self.program_plan))
    }
}

fn plan_summary(plan: &Option<Plan>) -> Option<&str> {
    plan.as_ref().and_then(|p| p.summary.as_deref())
}

impl Searchable for Organization {
    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(plan_summary(&self.company_plan).unwrap_or_default()),
            Cow::Borrowed(plan_summary(&self.program_plan).unwrap_or_default()),
            Cow::Owned(self.tags.join(" ")),
            Cow::Borrowed(self.contact_name.as_str()),
            Cow::Borrowed(self.email.as_str()),
        ]
    }
}

/// `null` or a non-string value reads as the empty string.
fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(de)?;
    Ok(value.as_str().unwrap_or_default().to_owned())
}

/// A non-string summary reads as no summary.
fn lenient_summary<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(de)?;
    Ok(value.as_str().map(str::to_owned))
}

/// A plan that is not an object reads as no plan.
fn lenient_plan<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Plan>, D::Error> {
    let value = serde_json::Value::deserialize(de)?;
    Ok(value.as_object().map(|plan| Plan {
        summary: plan
            .get("summary")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
    }))
}

/// A non-array `tags` value reads as no tags; non-string elements are dropped.
fn lenient_tags<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    let value = serde_json::Value::deserialize(de)?;
    Ok(value
        .as_array()
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default())
}

/// Simple aggregate statistics for a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub items: usize,
    pub tags: usize,
}

/// The loaded items plus the catalog of every tag they carry.
///
/// Immutable once built; a reload builds a new one. The items sit behind an
/// `Rc` so hosts can hold the same slice without copying it.
#[derive(Debug, Clone)]
pub struct Dataset<T> {
    items: Rc<[T]>,
    tags: BTreeSet<String>,
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Self {
            items: Rc::from(Vec::new()),
            tags: BTreeSet::new(),
        }
    }
}

impl<T: Searchable> Dataset<T> {
    pub fn new(items: Vec<T>) -> Self {
        let tags = items
            .iter()
            .flat_map(|item| item.tags().iter().cloned())
            .collect();
        Self {
            items: Rc::from(items),
            tags,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Another handle on the item slice.
    pub fn shared_items(&self) -> Rc<[T]> {
        Rc::clone(&self.items)
    }

    pub fn get(&self, id: ItemId) -> Option<&T> {
        self.items.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every ID in dataset order.
    pub fn ids(&self) -> Vec<ItemId> {
        (0..self.items.len() as ItemId).collect()
    }

    /// Sorted, de-duplicated tags for the filter menu.
    pub fn tag_catalog(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            items: self.items.len(),
            tags: self.tags.len(),
        }
    }
}
