use indexmap::IndexMap;

use crate::chat::{FunctionTool, ParameterProperty, ParametersSchema, Tool};

/// Builder for function parameters
pub struct ParamBuilder {
    name: String,
    property_type: String,
    description: String,
}

impl ParamBuilder {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            property_type: "string".to_string(),
            description: String::new(),
        }
    }

    pub fn type_of<T: Into<String>>(mut self, type_str: T) -> Self {
        self.property_type = type_str.into();
        self
    }

    pub fn description<D: Into<String>>(mut self, desc: D) -> Self {
        self.description = desc.into();
        self
    }

    pub fn build(self) -> (String, ParameterProperty) {
        (
            self.name,
            ParameterProperty {
                property_type: self.property_type,
                description: self.description,
            },
        )
    }
}

/// Builder for function tools
pub struct FunctionBuilder {
    name: String,
    description: String,
    parameters: Vec<ParamBuilder>,
    required: Vec<String>,
}

impl FunctionBuilder {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn description<D: Into<String>>(mut self, desc: D) -> Self {
        self.description = desc.into();
        self
    }

    pub fn param(mut self, param: ParamBuilder) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Tool {
        let mut props = IndexMap::new();
        for pb in self.parameters {
            let (key, prop) = pb.build();
            props.insert(key, prop);
        }

        let function = FunctionTool {
            name: self.name,
            description: self.description,
            parameters: ParametersSchema {
                schema_type: "object".to_string(),
                properties: props,
                required: self.required,
            },
        };

        Tool {
            tool_type: "function".to_string(),
            function,
        }
    }
}
