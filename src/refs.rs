use crate::font::StandardFont;
use pdf_writer::Ref;
use std::collections::HashMap;

#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub enum RefType {
    Catalog,
    Info,
    PageTree,
    Page(usize),
    ContentForPage(usize),
    Font(StandardFont),
    Image(usize),
    ImageMask(usize),
}

/// Hands out PDF object ids and remembers which object each id belongs to
pub struct ObjectReferences {
    refs: HashMap<RefType, Ref>,
    next_id: i32,
}

impl ObjectReferences {
    pub fn new() -> ObjectReferences {
        ObjectReferences {
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    /// Allocate an id that isn't tracked under any [RefType]
    pub fn bump(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    pub fn get(&self, ref_type: RefType) -> Option<Ref> {
        self.refs.get(&ref_type).copied()
    }

    pub fn gen(&mut self, ref_type: RefType) -> Ref {
        let id = self.bump();
        self.refs.insert(ref_type, id);
        id
    }

    /// Track an id that was allocated elsewhere (e.g. while renumbering an
    /// embedded SVG)
    pub fn set(&mut self, ref_type: RefType, id: Ref) {
        self.refs.insert(ref_type, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_tracked() {
        let mut refs = ObjectReferences::new();
        let catalog = refs.gen(RefType::Catalog);
        let loose = refs.bump();
        let page = refs.gen(RefType::Page(0));
        assert_ne!(catalog, loose);
        assert_ne!(loose, page);
        assert_eq!(refs.get(RefType::Page(0)), Some(page));
        assert_eq!(refs.get(RefType::Page(1)), None);

        refs.set(RefType::Image(0), loose);
        assert_eq!(refs.get(RefType::Image(0)), Some(loose));
    }
}
