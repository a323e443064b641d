use super::{Docs, Param, Ref, Type, TypeDefinition};

/// A freestanding function, or a method, static function or constructor of a resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub kind: FunctionKind,
    pub params: Vec<Param>,
    pub results: Results,
    pub docs: Docs,
}

impl Function {
    /// Every type mentioned by the signature: parameters first, then results.
    pub fn signature_types(&self) -> impl Iterator<Item = Type> + '_ {
        self.params
            .iter()
            .map(|p| p.ty)
            .chain(self.results.types())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Freestanding,
    /// The first parameter is `self`, a borrow of the associated type.
    Method(Ref<TypeDefinition>),
    Static(Ref<TypeDefinition>),
    Constructor(Ref<TypeDefinition>),
}

impl FunctionKind {
    /// The type a method, static function or constructor belongs to.
    pub fn associated_type(self) -> Option<Ref<TypeDefinition>> {
        match self {
            Self::Freestanding => None,
            Self::Method(ty) | Self::Static(ty) | Self::Constructor(ty) => Some(ty),
        }
    }
}

/// Function results: a single anonymous type, or any number of named values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Results {
    Anonymous(Type),
    Named(Vec<Param>),
}

impl Default for Results {
    fn default() -> Self {
        Self::Named(Vec::new())
    }
}

impl Results {
    pub fn len(&self) -> usize {
        match self {
            Self::Anonymous(_) => 1,
            Self::Named(params) => params.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        let (single, named) = match self {
            Self::Anonymous(ty) => (Some(*ty), &[][..]),
            Self::Named(params) => (None, params.as_slice()),
        };
        single.into_iter().chain(named.iter().map(|p| p.ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Primitive;

    #[test]
    fn results_report_their_types_in_order() {
        let anon = Results::Anonymous(Type::Primitive(Primitive::U32));
        assert_eq!(anon.len(), 1);
        assert_eq!(
            anon.types().collect::<Vec<_>>(),
            vec![Type::Primitive(Primitive::U32)]
        );

        let named = Results::Named(vec![
            Param {
                name: "a".into(),
                ty: Type::Primitive(Primitive::Bool),
            },
            Param {
                name: "b".into(),
                ty: Type::Primitive(Primitive::String),
            },
        ]);
        assert_eq!(
            named.types().collect::<Vec<_>>(),
            vec![
                Type::Primitive(Primitive::Bool),
                Type::Primitive(Primitive::String)
            ]
        );
        assert!(Results::default().is_empty());
    }

    #[test]
    fn freestanding_functions_have_no_associated_type() {
        assert_eq!(FunctionKind::Freestanding.associated_type(), None);
    }
}
