use super::*;

#[test]
fn intern_is_stable() {
    let interner = StringInterner::new();
    let a = interner.intern("fact");
    let b = interner.intern("fact");
    let c = interner.intern("n");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.lookup(a), "fact");
    assert_eq!(interner.lookup(c), "n");
}

#[test]
fn primitive_names_are_pre_interned() {
    let interner = StringInterner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.intern("Y"), Name::Y);
    assert_eq!(interner.intern("Print"), Name::PRINT);
    assert_eq!(interner.intern("print"), Name::PRINT_LOWER);
    assert_eq!(interner.intern("nil"), Name::NIL);
    assert_eq!(interner.intern("ItoS"), Name::ITOS);
    assert_eq!(interner.lookup(Name::CONC), "Conc");
    assert_eq!(interner.lookup(Name::EMPTY), "");
    assert!(interner.is_empty());
}

#[test]
fn len_counts_new_strings() {
    let interner = StringInterner::new();
    let base = interner.len();
    interner.intern("x");
    interner.intern("y");
    interner.intern("x");
    assert_eq!(interner.len(), base + 2);
    assert!(!interner.is_empty());
}

#[test]
fn shared_interner_clones_share_names() {
    let interner = SharedInterner::new();
    let other = interner.clone();
    let x = interner.intern("x");
    assert_eq!(other.intern("x"), x);
    assert_eq!(StringLookup::lookup(&*other, x), "x");
}
