use crate::gramps_node;
use crate::schema::{EntityMeta, Link, ObjRef, Url};

gramps_node! {
    /// Geographic coordinates, kept as written.
    pub struct Coord {
        attr long: String = "long",
        attr lat: String = "lat",
    }
}

gramps_node! {
    pub struct Location {
        attr street: Option<String> = "street",
        attr locality: Option<String> = "locality",
        attr city: Option<String> = "city",
        attr parish: Option<String> = "parish",
        attr county: Option<String> = "county",
        attr state: Option<String> = "state",
        attr country: Option<String> = "country",
        attr postal: Option<String> = "postal",
        attr phone: Option<String> = "phone",
    }
}

gramps_node! {
    pub struct PlaceObj {
        embed meta: EntityMeta,
        text title: Option<String> = "ptitle",
        maybe coord: Option<Coord> = "coord",
        many locations: Vec<Location> = "location",
        many obj_refs: Vec<ObjRef> = "objref",
        many urls: Vec<Url> = "url",
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
    fn test_place_binding() {
        let place: PlaceObj = decode_any(
            br#"<placeobj handle="_pl1" change="1" id="P0001">
                  <ptitle>Springfield, IL</ptitle>
                  <coord long="-89.65" lat="39.78"/>
                  <location city="Springfield" state="IL" country="USA"/>
                </placeobj>"#,
        )
        .unwrap();
        assert_eq!(place.title.as_deref(), Some("Springfield, IL"));
        assert_eq!(place.coord.as_ref().map(|c| c.lat.as_str()), Some("39.78"));
        assert_eq!(place.locations[0].country.as_deref(), Some("USA"));
        assert_eq!(place.locations[0].parish, None);
        assert!(place.unparsed.is_empty());
    }
}
