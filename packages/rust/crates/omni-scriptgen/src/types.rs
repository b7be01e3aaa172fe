//! Type descriptions and the type accelerator table.
//!
//! The writer never inspects real runtime types; callers describe the type
//! they want rendered with a [`TypeName`].

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// A type to render in script code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// Dotted namespace, if any.
    pub namespace: Option<String>,
    /// Simple name without namespace or generic arity.
    pub name: String,
    /// Generic type arguments.
    pub generic_args: Vec<TypeName>,
    /// Array rank; 0 for non-array types.
    pub array_rank: usize,
    /// Whether script code can reference the type by name.
    pub is_public: bool,
    /// Public type from the same assembly, used to look up non-public types.
    pub lookup_anchor: Option<Box<TypeName>>,
}

impl TypeName {
    /// A public, non-generic type.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            namespace: (!namespace.is_empty()).then_some(namespace),
            name: name.into(),
            generic_args: Vec::new(),
            array_rank: 0,
            is_public: true,
            lookup_anchor: None,
        }
    }

    /// Split a dotted full name at its last dot.
    ///
    /// `"System.IO.Path"` becomes namespace `System.IO`, name `Path`.
    #[must_use]
    pub fn parse(full_name: &str) -> Self {
        match full_name.rsplit_once('.') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new("", full_name),
        }
    }

    /// Set generic type arguments.
    #[must_use]
    pub fn with_generic_args(mut self, args: Vec<TypeName>) -> Self {
        self.generic_args = args;
        self
    }

    /// Make this an array type of `rank` dimensions.
    #[must_use]
    pub fn array(mut self, rank: usize) -> Self {
        self.array_rank = rank;
        self
    }

    /// Mark the type as not referenceable by name.
    ///
    /// `anchor` is a public type from the same assembly whose assembly is
    /// searched at runtime.
    #[must_use]
    pub fn non_public(mut self, anchor: Option<TypeName>) -> Self {
        self.is_public = false;
        self.lookup_anchor = anchor.map(Box::new);
        self
    }

    /// `Namespace.Name`, without generic arguments or array suffix.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// `[]`, `[,]` and so on for array types; empty otherwise.
    #[must_use]
    pub fn array_suffix(&self) -> String {
        if self.array_rank == 0 {
            String::new()
        } else {
            format!("[{}]", ",".repeat(self.array_rank - 1))
        }
    }
}

static BUILTIN_ACCELERATORS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    [
        ("System.Array", "array"),
        ("System.Boolean", "bool"),
        ("System.Byte", "byte"),
        ("System.Char", "char"),
        ("System.DateTime", "datetime"),
        ("System.Decimal", "decimal"),
        ("System.Double", "double"),
        ("System.Guid", "guid"),
        ("System.Int16", "short"),
        ("System.Int32", "int"),
        ("System.Int64", "long"),
        ("System.Object", "object"),
        ("System.SByte", "sbyte"),
        ("System.Single", "float"),
        ("System.String", "string"),
        ("System.TimeSpan", "timespan"),
        ("System.Type", "type"),
        ("System.UInt16", "ushort"),
        ("System.UInt32", "uint"),
        ("System.UInt64", "ulong"),
        ("System.Uri", "uri"),
        ("System.Version", "version"),
        ("System.Void", "void"),
        ("System.Collections.Hashtable", "hashtable"),
        ("System.Collections.Specialized.OrderedDictionary", "ordered"),
        ("System.Globalization.CultureInfo", "cultureinfo"),
        ("System.Management.Automation.PSCredential", "pscredential"),
        ("System.Management.Automation.PSObject", "psobject"),
        ("System.Management.Automation.ScriptBlock", "scriptblock"),
        ("System.Management.Automation.SwitchParameter", "switch"),
        ("System.Net.IPAddress", "ipaddress"),
        ("System.Numerics.BigInteger", "bigint"),
        ("System.Security.SecureString", "securestring"),
        ("System.Text.RegularExpressions.Regex", "regex"),
        ("System.Xml.XmlDocument", "xml"),
    ]
    .into_iter()
    .map(|(full, short)| (full.to_ascii_lowercase(), short.to_string()))
    .collect()
});

/// Short aliases for well-known full type names.
///
/// Lookups ignore ASCII case, matching how the language resolves type names.
#[derive(Debug, Clone, Default)]
pub struct TypeAccelerators {
    by_full_name: HashMap<String, String>,
}

impl TypeAccelerators {
    /// The built-in accelerator set.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            by_full_name: BUILTIN_ACCELERATORS.clone(),
        }
    }

    /// A table with no accelerators.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register `alias` for `full_name`.
    pub fn insert(&mut self, full_name: &str, alias: impl Into<String>) {
        self.by_full_name
            .insert(full_name.to_ascii_lowercase(), alias.into());
    }

    /// Accelerator for `full_name`, if one exists.
    #[must_use]
    pub fn lookup(&self, full_name: &str) -> Option<&str> {
        self.by_full_name
            .get(&full_name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_name() {
        let ty = TypeName::parse("System.Collections.Generic.List");
        assert_eq!(ty.namespace.as_deref(), Some("System.Collections.Generic"));
        assert_eq!(ty.name, "List");
        assert_eq!(TypeName::parse("Widget").namespace, None);
    }

    #[test]
    fn test_array_suffix() {
        assert_eq!(TypeName::parse("System.Int32").array_suffix(), "");
        assert_eq!(TypeName::parse("System.Int32").array(1).array_suffix(), "[]");
        assert_eq!(TypeName::parse("System.Int32").array(3).array_suffix(), "[,,]");
    }

    #[test]
    fn test_accelerator_lookup_ignores_case() {
        let accelerators = TypeAccelerators::builtin();
        assert_eq!(accelerators.lookup("system.string"), Some("string"));
        assert_eq!(accelerators.lookup("System.IO.Path"), None);
        assert_eq!(TypeAccelerators::empty().lookup("System.String"), None);
    }
}
