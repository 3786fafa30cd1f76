//! Class-hierarchy contract consumed by the reference-value lattice
//!
//! The lattice never models the hierarchy itself; it only needs subtype
//! queries and stable class identity. Hosts with their own class model
//! implement [`Clazz`]; [`ClassPool`] is a minimal concrete model for
//! everyone else (and for every test in this repository).

use indexmap::IndexMap;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Resolved class identity as seen by the lattice.
///
/// Implementations answer transitive subtype queries and expose their
/// supertypes so joins can locate least upper bounds.
pub trait Clazz: fmt::Debug + Send + Sync {
    /// Internal type descriptor of this class, e.g. `java/lang/Object`.
    fn name(&self) -> &str;

    /// Whether this class transitively extends or implements the named
    /// class. A class extends itself.
    fn extends_or_implements(&self, name: &str) -> bool;

    /// Transitive supertypes, nearest first. Does not include the class
    /// itself.
    fn super_chain(&self) -> SmallVec<[ClassRef; 4]>;
}

/// Cheap cloneable handle to a [`Clazz`].
///
/// Identity is the class name alone, so handles from different hierarchy
/// models compare consistently and can serve as deduplication keys.
#[derive(Clone)]
pub struct ClassRef(Arc<dyn Clazz>);

impl ClassRef {
    pub fn new(class: Arc<dyn Clazz>) -> Self {
        ClassRef(class)
    }
}

impl Deref for ClassRef {
    type Target = dyn Clazz;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassRef").field(&self.name()).finish()
    }
}

/// Nearest class that both `a` and `b` extend or implement.
///
/// Candidates are the intersection of both self-inclusive supertype
/// chains. Among them, the winner minimizes the larger of its two chain
/// distances, then the total distance, then the class name. Every
/// criterion is symmetric in the operands, so the result is independent
/// of operand order even on diamond hierarchies; the single-typed join
/// relies on that for its commutativity law.
///
/// Returns `None` only when the two classes live in disconnected
/// hierarchies, i.e. they do not even share a root.
pub fn common_superclass(a: &ClassRef, b: &ClassRef) -> Option<ClassRef> {
    let a_chain = inclusive_chain(a);
    let b_chain = inclusive_chain(b);

    let mut best: Option<(usize, usize, &ClassRef)> = None;
    for (a_distance, class) in a_chain.iter().enumerate() {
        let Some(b_distance) = b_chain.iter().position(|sup| sup == class) else {
            continue;
        };
        let candidate = (a_distance.max(b_distance), a_distance + b_distance, class);
        let better = match best {
            None => true,
            Some((max, sum, current)) => {
                (candidate.0, candidate.1, class.name()) < (max, sum, current.name())
            }
        };
        if better {
            best = Some(candidate);
        }
    }
    best.map(|(_, _, class)| class.clone())
}

/// The class itself followed by its supertype chain.
fn inclusive_chain(class: &ClassRef) -> SmallVec<[ClassRef; 4]> {
    let mut chain = SmallVec::new();
    chain.push(class.clone());
    chain.extend(class.super_chain());
    chain
}

/// Minimal named hierarchy backing the [`Clazz`] contract.
///
/// Classes are registered bottom-up with handles to their direct
/// supertypes; lookups return the shared handle for a name.
#[derive(Debug, Default)]
pub struct ClassPool {
    classes: IndexMap<String, ClassRef>,
}

impl ClassPool {
    pub fn new() -> Self {
        Self {
            classes: IndexMap::new(),
        }
    }

    /// Register a class with the given direct supertypes and return its
    /// handle. Re-registering a name replaces the previous entry.
    pub fn add_class(&mut self, name: &str, supers: &[ClassRef]) -> ClassRef {
        let class = ClassRef::new(Arc::new(PoolClass {
            name: name.to_string(),
            supers: supers.to_vec(),
        }));
        self.classes.insert(name.to_string(), class.clone());
        class
    }

    /// Look up the handle for a registered class name.
    pub fn class(&self, name: &str) -> Option<ClassRef> {
        self.classes.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[derive(Debug)]
struct PoolClass {
    name: String,
    supers: Vec<ClassRef>,
}

impl Clazz for PoolClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn extends_or_implements(&self, name: &str) -> bool {
        self.name == name || self.supers.iter().any(|sup| sup.extends_or_implements(name))
    }

    fn super_chain(&self) -> SmallVec<[ClassRef; 4]> {
        // Breadth-first so direct supertypes come before indirect ones;
        // the first occurrence of a class is kept on diamond hierarchies.
        let mut chain: SmallVec<[ClassRef; 4]> = SmallVec::new();
        let mut queue: VecDeque<ClassRef> = self.supers.iter().cloned().collect();
        while let Some(class) = queue.pop_front() {
            if chain.contains(&class) {
                continue;
            }
            queue.extend(class.super_chain());
            chain.push(class);
        }
        chain
    }
}
