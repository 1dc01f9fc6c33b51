/// Known area codes for Cape Town suburbs, keyed by location slug
const AREA_CODES: &[(&str, &str)] = &[
    ("kenilworth", "8669"),
    ("kenilworth-upper", "14224"),
    ("claremont", "8667"),
    ("rondebosch", "8671"),
    ("newlands", "8670"),
    ("wynberg", "8675"),
    ("constantia", "8668"),
    ("plumstead", "8674"),
    ("diep-river", "8673"),
    ("bergvliet", "8666"),
    ("tokai", "8676"),
    ("retreat", "8678"),
    ("muizenberg", "8680"),
    ("lakeside", "8679"),
    ("observatory", "8665"),
    ("mowbray", "8672"),
    ("gardens", "8659"),
    ("oranjezicht", "8661"),
    ("tamboerskloof", "8663"),
    ("sea-point", "8657"),
    ("green-point", "8656"),
    ("waterfront", "8655"),
    ("camps-bay", "8652"),
    ("hout-bay", "8651"),
    ("pinelands", "8683"),
    ("thornton", "8686"),
    ("milnerton", "1737"),
    ("tableview", "10043"),
    ("bloubergstrand", "1734"),
    ("parklands", "8684"),
    ("woodstock", "8664"),
    ("salt-river", "8681"),
];

pub fn area_code(location_slug: &str) -> Option<&'static str> {
    AREA_CODES
        .iter()
        .find(|(slug, _)| *slug == location_slug)
        .map(|(_, code)| *code)
}
