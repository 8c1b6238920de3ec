use std::collections::HashMap;

use crate::{DType, Shape};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IOName(pub String);

impl IOName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IOName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IOName {
    fn from(s: &str) -> Self {
        IOName(s.to_string())
    }
}

/// Axis order of a 3-D image input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    #[default]
    Unspecified,
    ChannelFirst,
    ChannelLast,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputDef {
    pub name: IOName,
    pub dims: Vec<i64>, // -1 = variable
    pub layout: Layout,
    pub dtype: DType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputDef {
    pub name: IOName,
    pub dims: Vec<i64>,
    pub dtype: DType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// 0 means the model takes no batch axis.
    pub max_batch_size: u32,
    pub inputs: Vec<InputDef>,
    pub outputs: Vec<OutputDef>,
}

/// Point-in-time view of the models a server has deployed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub models: HashMap<String, ModelDescriptor>,
}

impl StatusSnapshot {
    pub fn get(&self, model: &str) -> Option<&ModelDescriptor> {
        self.models.get(model)
    }
}

/// How to address a single-input, single-output vector classifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    pub input_name: IOName,
    pub output_name: IOName,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
    pub input_layout: Layout,
    /// Input dims as declared by the model, batch axis excluded.
    pub input_dims: Shape,
    pub input_element_type: DType,
    pub output_element_type: DType,
}

impl ModelConfig {
    pub fn input_elements(&self) -> usize {
        self.channels * self.height * self.width
    }

    /// Bytes of one input instance. The resolver only admits fixed-width
    /// input types.
    pub fn input_instance_bytes(&self) -> usize {
        self.input_elements() * self.input_element_type.byte_size().unwrap_or_default()
    }
}
