use crate::gramps_node;
use crate::schema::{Attribute, EntityMeta, EventRef, LdsOrd, Link, ObjRef};
use crate::xml::Flag;

gramps_node! {
    /// Relationship type of a family: `<rel type="Married"/>`.
    pub struct FamilyRel {
        attr kind: String = "type",
    }
}

gramps_node! {
    pub struct ChildRef {
        attr hlink: String = "hlink",
        attr private: Flag = "priv",
        attr mrel: Option<String> = "mrel",
        attr frel: Option<String> = "frel",
        many citation_refs: Vec<Link> = "citationref",
        many note_refs: Vec<Link> = "noteref",
    }
}

gramps_node! {
    pub struct Family {
        embed meta: EntityMeta,
        maybe rel: Option<FamilyRel> = "rel",
        maybe father: Option<Link> = "father",
        maybe mother: Option<Link> = "mother",
        many event_refs: Vec<EventRef> = "eventref",
        many lds_ords: Vec<LdsOrd> = "lds_ord",
        many obj_refs: Vec<ObjRef> = "objref",
        many child_refs: Vec<ChildRef> = "childref",
        many attributes: Vec<Attribute> = "attribute",
        many note_refs: Vec<Link> = "noteref",
        many citation_refs: Vec<Link> = "citationref",
        many tag_refs: Vec<Link> = "tagref",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::decode_any;

    #[test]
    fn test_family_binding() {
        let family: Family = decode_any(
            br#"<family handle="_f1" change="1" id="F0001">
                  <rel type="Married"/>
                  <father hlink="_p1"/>
                  <mother hlink="_p2"/>
                  <childref hlink="_p3" mrel="Adopted"/>
                </family>"#,
        )
        .unwrap();
        assert_eq!(family.rel.map(|rel| rel.kind).as_deref(), Some("Married"));
        assert_eq!(family.father.map(|link| link.hlink).as_deref(), Some("_p1"));
        assert_eq!(family.child_refs[0].mrel.as_deref(), Some("Adopted"));
        assert_eq!(family.child_refs[0].frel, None);
        assert!(family.unparsed.is_empty());
    }
}
