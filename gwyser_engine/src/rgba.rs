use gwyser_types::{
    assign_boxed_cloned, boxed_equal, filter_items, AssignError, ErrorList, ItemSpec, ItemType,
    SerializableBoxed, WireItem, WireItems, WireValue,
};

static SCHEMA: &[ItemSpec] = &[
    ItemSpec::new("r", ItemType::Double),
    ItemSpec::new("g", ItemType::Double),
    ItemSpec::new("b", ItemType::Double),
    ItemSpec::new("a", ItemType::Double),
];

/// A colour with alpha, each component nominally in `0.0..=1.0`.
///
/// Serialized as a boxed value. All four components are always written.
#[derive(Default, PartialEq, Clone, Copy, Debug)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

impl SerializableBoxed for Rgba {
    fn type_name(&self) -> &'static str {
        "GwyRGBA"
    }

    fn n_items(&self) -> usize {
        SCHEMA.len()
    }

    fn itemize<'a>(&'a self, items: &mut WireItems<'a>) {
        items.push("r", WireValue::Double(self.r));
        items.push("g", WireValue::Double(self.g));
        items.push("b", WireValue::Double(self.b));
        items.push("a", WireValue::Double(self.a));
    }

    fn construct(&mut self, items: Vec<WireItem<'static>>, errors: &mut ErrorList) -> bool {
        let mut its = filter_items(SCHEMA, items, self.type_name(), errors);
        if !its.is_ok() {
            return false;
        }
        self.r = its.take_double("r").unwrap_or_default();
        self.g = its.take_double("g").unwrap_or_default();
        self.b = its.take_double("b").unwrap_or_default();
        self.a = its.take_double("a").unwrap_or_default();
        true
    }

    fn duplicate(&self) -> Box<dyn SerializableBoxed> {
        Box::new(*self)
    }

    fn assign(&mut self, source: &dyn SerializableBoxed) -> Result<(), AssignError> {
        assign_boxed_cloned(self, source)
    }

    fn equal(&self, other: &dyn SerializableBoxed) -> bool {
        boxed_equal(self, other)
    }
}
