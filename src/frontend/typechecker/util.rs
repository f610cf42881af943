use crate::frontend::typechecker::graph::{ClassNode, FeatureDecl, FormalDecl, MethodSig};
use crate::util::symbol::{sym, Symbol};

/// classes that cannot be redefined by the user program
pub fn is_basic_class(name: Symbol) -> bool {
    [sym::OBJECT, sym::IO, sym::INT, sym::BOOL, sym::STRING, sym::SELF_TYPE].contains(&name)
}

fn method(ident: Symbol, formals: &[(Symbol, Symbol)], ret: Symbol) -> FeatureDecl {
    let formals = formals.iter()
        .map(|(ident, t)| FormalDecl { ident: *ident, t: *t, line: 0 })
        .collect();
    FeatureDecl::Method(MethodSig { ident, formals, ret, line: 0 })
}

fn attr(ident: Symbol, t: Symbol) -> FeatureDecl {
    FeatureDecl::Attribute { ident, t, line: 0 }
}

fn basic_class(ident: Symbol, parent: Symbol, features: Vec<FeatureDecl>) -> ClassNode {
    ClassNode { ident, parent, file: sym::BASIC_CLASS_FILE, line: 0, features }
}

/// get declarations of all basic classes, Object first
pub fn get_basic_classes() -> Vec<ClassNode> {
    let object = basic_class(sym::OBJECT, sym::NO_CLASS, vec![
        method(sym::ABORT, &[], sym::OBJECT),
        method(sym::TYPE_NAME, &[], sym::STRING),
        method(sym::COPY, &[], sym::SELF_TYPE),
    ]);
    let io = basic_class(sym::IO, sym::OBJECT, vec![
        method(sym::OUT_STRING, &[(sym::ARG, sym::STRING)], sym::SELF_TYPE),
        method(sym::OUT_INT, &[(sym::ARG, sym::INT)], sym::SELF_TYPE),
        method(sym::IN_STRING, &[], sym::STRING),
        method(sym::IN_INT, &[], sym::INT),
    ]);
    // raw value slots are not visible to cool programs
    let int = basic_class(sym::INT, sym::OBJECT, vec![attr(sym::VAL, sym::PRIM_SLOT)]);
    let bool = basic_class(sym::BOOL, sym::OBJECT, vec![attr(sym::VAL, sym::PRIM_SLOT)]);
    let string = basic_class(sym::STRING, sym::OBJECT, vec![
        attr(sym::VAL, sym::INT),
        attr(sym::STR_FIELD, sym::PRIM_SLOT),
        method(sym::LENGTH, &[], sym::INT),
        method(sym::CONCAT, &[(sym::ARG, sym::STRING)], sym::STRING),
        method(sym::SUBSTR, &[(sym::ARG, sym::INT), (sym::ARG2, sym::INT)], sym::STRING),
    ]);
    vec![object, io, int, bool, string]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_classes_inherit_object() {
        let classes = get_basic_classes();
        assert_eq!(classes[0].ident, sym::OBJECT);
        assert_eq!(classes[0].parent, sym::NO_CLASS);
        assert!(classes[1..].iter().all(|cls| cls.parent == sym::OBJECT));
        assert!(classes.iter().all(|cls| is_basic_class(cls.ident)));
        assert!(is_basic_class(sym::SELF_TYPE));
        assert!(!is_basic_class(sym::MAIN));
    }

    #[test]
    fn substr_takes_two_ints() {
        let string = &get_basic_classes()[4];
        let substr = string.features.iter()
            .find_map(|feature| match feature {
                FeatureDecl::Method(sig) if sig.ident == sym::SUBSTR => Some(sig),
                _ => None,
            });
        match substr {
            Some(sig) => {
                assert_eq!(sig.formals.len(), 2);
                assert!(sig.formals.iter().all(|f| f.t == sym::INT));
                assert_eq!(sig.ret, sym::STRING);
            }
            None => panic!("String.substr is missing"),
        }
    }
}
