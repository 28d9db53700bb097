//! Objects, lists and the closed `Model` sum type

use std::collections::BTreeMap;
use std::fmt;

use super::value::{ScalarKind, Value};

/// Runtime kind of a model node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Scalar(ScalarKind),
    Object,
    List,
}

/// Any node of a dynamic model tree
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Scalar(Value),
    Object(Object),
    List(ModelList),
}

impl Model {
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Scalar(v) => ModelKind::Scalar(v.kind()),
            Model::Object(_) => ModelKind::Object,
            Model::List(_) => ModelKind::List,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Model::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Model::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

/// Scalars print their canonical form, containers their debug form
impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Scalar(v) => write!(f, "{}", v),
            Model::Object(o) => f.write_str(&o.debug_str()),
            Model::List(l) => f.write_str(&l.debug_str()),
        }
    }
}

macro_rules! model_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Model {
                fn from(v: $ty) -> Self {
                    Model::Scalar(v.into())
                }
            }
        )*
    };
}

model_from_scalar!(i16, i32, i64, u16, u32, u64, bool, f32, f64, char, String, &str, Value);

impl From<Object> for Model {
    fn from(o: Object) -> Self {
        Model::Object(o)
    }
}

impl From<ModelList> for Model {
    fn from(l: ModelList) -> Self {
        Model::List(l)
    }
}

/// An ordered list of model nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelList {
    items: Vec<Model>,
}

impl ModelList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Into<Model>) {
        self.items.push(item.into());
    }

    /// Element at `index`, or `None` when out of range
    pub fn at(&self, index: usize) -> Option<&Model> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.items.iter()
    }

    pub fn debug_str(&self) -> String {
        let items: Vec<String> = self
            .items
            .iter()
            .map(|item| format!("{{{}}}", item))
            .collect();
        format!("[{}]", items.join(""))
    }
}

impl<T: Into<Model>> From<Vec<T>> for ModelList {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Into<Model>> FromIterator<T> for ModelList {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ModelList {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A dynamic object with named members and dispatch tags
///
/// A member name belongs to exactly one category (scalar, object or list);
/// inserting a name into one category removes it from the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    tags: Vec<String>,
    plains: BTreeMap<String, Value>,
    objects: BTreeMap<String, Object>,
    lists: BTreeMap<String, ModelList>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dispatch tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.add_tag(tag);
        self
    }

    /// Add a scalar member
    pub fn with_plain(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_plain_value(name, value);
        self
    }

    /// Add a nested object member
    pub fn with_object(mut self, name: impl Into<String>, object: Object) -> Self {
        self.set_object(name, object);
        self
    }

    /// Add a list member
    pub fn with_list(mut self, name: impl Into<String>, list: impl Into<ModelList>) -> Self {
        self.set_list(name, list);
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn set_plain_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.forget(&name);
        self.plains.insert(name, value.into());
    }

    pub fn set_object(&mut self, name: impl Into<String>, object: Object) {
        let name = name.into();
        self.forget(&name);
        self.objects.insert(name, object);
    }

    pub fn set_list(&mut self, name: impl Into<String>, list: impl Into<ModelList>) {
        let name = name.into();
        self.forget(&name);
        self.lists.insert(name, list.into());
    }

    fn forget(&mut self, name: &str) {
        self.plains.remove(name);
        self.objects.remove(name);
        self.lists.remove(name);
    }

    /// Declared dispatch tags, in declaration order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_plain_member(&self, name: &str) -> bool {
        self.plains.contains_key(name)
    }

    pub fn is_object_member(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn is_list_member(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn get_plain(&self, name: &str) -> Option<&Value> {
        self.plains.get(name)
    }

    pub fn get_plain_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.plains.get_mut(name)
    }

    pub fn get_object(&self, name: &str) -> Option<&Object> {
        self.objects.get(name)
    }

    pub fn get_list(&self, name: &str) -> Option<&ModelList> {
        self.lists.get(name)
    }

    /// Kind of the member called `name`, if any
    pub fn member_kind(&self, name: &str) -> Option<ModelKind> {
        if let Some(v) = self.plains.get(name) {
            Some(ModelKind::Scalar(v.kind()))
        } else if self.objects.contains_key(name) {
            Some(ModelKind::Object)
        } else if self.lists.contains_key(name) {
            Some(ModelKind::List)
        } else {
            None
        }
    }

    /// One-line `name:value,...` dump of every member, used in logs
    pub fn debug_str(&self) -> String {
        let mut parts = Vec::new();
        for (name, value) in &self.plains {
            parts.push(format!("{}:{}", name, value));
        }
        for (name, list) in &self.lists {
            parts.push(format!("{}:{}", name, list.debug_str()));
        }
        for (name, object) in &self.objects {
            parts.push(format!("{}:{{{}}}", name, object.debug_str()));
        }
        parts.join(",")
    }
}
