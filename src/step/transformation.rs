//! Declarative map/filter/reduce steps over a single state entry.
//!
//! The shape of the result follows the shape of the source collection: a
//! sequence maps and filters to a sequence, a mapping to a mapping. Mapping
//! entries are presented to the function as `[key, value]` pairs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::StepInvoke;
use crate::{
    Error, ExecutionContext, Result, StepKind, StepOutput, WorkflowState, WorkflowStep,
};

type MapFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;
type PredicateFn = Arc<dyn Fn(&Value) -> Result<bool> + Send + Sync>;
type ReduceFn = Arc<dyn Fn(Value, Value) -> Result<Value> + Send + Sync>;

/// The name of a transformation, without its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformationKind {
    Map,
    Filter,
    Reduce,
}

impl fmt::Display for TransformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransformationKind::Map => "map",
            TransformationKind::Filter => "filter",
            TransformationKind::Reduce => "reduce",
        })
    }
}

/// A source collection, classified before any function is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Sequence(Vec<Value>),
    Mapping(Map<String, Value>),
}

impl Collection {
    /// The elements in iteration order; mapping entries become `[key, value]` pairs.
    pub fn into_elements(self) -> Vec<Value> {
        match self {
            Collection::Sequence(items) => items,
            Collection::Mapping(entries) => entries
                .into_iter()
                .map(|(key, value)| pair(key, value))
                .collect(),
        }
    }
}

impl TryFrom<Value> for Collection {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Collection::Sequence(items)),
            Value::Object(entries) => Ok(Collection::Mapping(entries)),
            other => Err(Error::Transformation(format!(
                "expected a sequence or mapping, found {other}"
            ))),
        }
    }
}

fn pair(key: String, value: Value) -> Value {
    Value::Array(vec![Value::String(key), value])
}

fn unpair(value: Value) -> Result<(String, Value)> {
    match value {
        Value::Array(mut items) if items.len() == 2 => {
            let value = items.pop().unwrap_or(Value::Null);
            match items.pop() {
                Some(Value::String(key)) => Ok((key, value)),
                other => Err(Error::Transformation(format!(
                    "mapping keys must be strings, found {}",
                    other.unwrap_or(Value::Null)
                ))),
            }
        }
        other => Err(Error::Transformation(format!(
            "map over a mapping must return [key, value] pairs, found {other}"
        ))),
    }
}

/// A transformation together with the function it applies.
#[derive(Clone)]
pub enum Transformation {
    /// Apply a function to every element.
    Map(MapFn),
    /// Keep the elements for which a predicate holds.
    Filter(PredicateFn),
    /// Left-fold the elements, seeding with the first.
    Reduce(ReduceFn),
}

impl Transformation {
    /// Which operation this is, without the function.
    pub fn kind(&self) -> TransformationKind {
        match self {
            Transformation::Map(_) => TransformationKind::Map,
            Transformation::Filter(_) => TransformationKind::Filter,
            Transformation::Reduce(_) => TransformationKind::Reduce,
        }
    }

    /// Apply the transformation to a collection value.
    pub fn apply(&self, values: Value) -> Result<Value> {
        let collection = Collection::try_from(values)?;
        match (self, collection) {
            (Transformation::Map(f), Collection::Sequence(items)) => items
                .into_iter()
                .map(|item| f(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            (Transformation::Map(f), Collection::Mapping(entries)) => entries
                .into_iter()
                .map(|(key, value)| unpair(f(pair(key, value))?))
                .collect::<Result<Map<_, _>>>()
                .map(Value::Object),
            (Transformation::Filter(p), Collection::Sequence(items)) => {
                let mut kept = Vec::new();
                for item in items {
                    if p(&item)? {
                        kept.push(item);
                    }
                }
                Ok(Value::Array(kept))
            }
            (Transformation::Filter(p), Collection::Mapping(entries)) => {
                let mut kept = Map::new();
                for (key, value) in entries {
                    let entry = pair(key, value);
                    if p(&entry)? {
                        let (key, value) = unpair(entry)?;
                        kept.insert(key, value);
                    }
                }
                Ok(Value::Object(kept))
            }
            (Transformation::Reduce(f), collection) => {
                let mut elements = collection.into_elements().into_iter();
                let first = elements.next().ok_or_else(|| {
                    Error::Transformation("reduce of an empty collection".to_string())
                })?;
                elements.try_fold(first, |acc, item| f(acc, item))
            }
        }
    }
}

impl fmt::Debug for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transformation::{}", self.kind())
    }
}

/// A step that transforms the collection stored under one state entry.
///
/// # Example
///
/// ```rust
/// use agent_workflow::TransformationStep;
/// use serde_json::{json, Value};
///
/// let doubled = TransformationStep::map("doubled", "numbers", |x| {
///     Ok(json!(x.as_i64().unwrap_or(0) * 2))
/// });
/// let evens = TransformationStep::filter("evens", "numbers", |x| {
///     Ok(x.as_i64().is_some_and(|n| n % 2 == 0))
/// });
/// ```
pub struct TransformationStep {
    name: String,
    input_field: String,
    transformation: Transformation,
}

impl TransformationStep {
    /// Create a step that applies `transformation` to the `input_field` entry.
    pub fn new(
        name: impl Into<String>,
        input_field: impl Into<String>,
        transformation: Transformation,
    ) -> Self {
        Self {
            name: name.into(),
            input_field: input_field.into(),
            transformation,
        }
    }

    /// A `map` over `input_field`.
    pub fn map<F>(name: impl Into<String>, input_field: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, input_field, Transformation::Map(Arc::new(f)))
    }

    /// A `filter` over `input_field`.
    pub fn filter<F>(name: impl Into<String>, input_field: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<bool> + Send + Sync + 'static,
    {
        Self::new(name, input_field, Transformation::Filter(Arc::new(f)))
    }

    /// A `reduce` over `input_field`.
    pub fn reduce<F>(name: impl Into<String>, input_field: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, input_field, Transformation::Reduce(Arc::new(f)))
    }

    /// The state entry this step reads.
    pub fn input_field(&self) -> &str {
        &self.input_field
    }

    /// The operation applied to the input.
    pub fn transformation(&self) -> &Transformation {
        &self.transformation
    }
}

#[async_trait]
impl StepInvoke for TransformationStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StepKind {
        StepKind::Transformation
    }

    async fn invoke(&self, ctx: &ExecutionContext, state: &WorkflowState) -> Result<StepOutput> {
        let values = state
            .get(&self.input_field)
            .cloned()
            .ok_or_else(|| Error::MissingField {
                step: self.name.clone(),
                field: self.input_field.clone(),
            })?;

        let mut inputs = Map::new();
        inputs.insert(self.input_field.clone(), values.clone());
        debug!(step = %self.name, transformation = %self.transformation.kind(), "transforming");
        ctx.report(&self.name, "inputs", &Value::Object(inputs.clone()));

        let output = self.transformation.apply(values)?;
        debug!(step = %self.name, output = %output, "transformation output");

        Ok(StepOutput {
            step: WorkflowStep::recorded(StepKind::Transformation, inputs.clone(), output.clone()),
            inputs,
            output,
        })
    }
}
