use crate::Factory;
use anyhow::{anyhow, Result};
use gwyser_types::{
    filter_items, AssignError, DeserializeError, ErrorList, ItemSpec, ItemType,
    Serializable, WireItem, WireItems, WireValue,
};
use std::borrow::Cow;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum SelectionKind {
    Point,
    Line,
    Rectangle,
}
impl SelectionKind {
    pub const ALL: [Self; 3] = [Self::Point, Self::Line, Self::Rectangle];

    /// Number of coordinates describing one shape.
    pub fn shape_size(self) -> usize {
        match self {
            Self::Point => 2,
            Self::Line | Self::Rectangle => 4,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Point => "GwySelectionPoint",
            Self::Line => "GwySelectionLine",
            Self::Rectangle => "GwySelectionRectangle",
        }
    }

    pub(crate) fn factory(self) -> Factory {
        fn point() -> Box<dyn Serializable> {
            Box::new(Selection::new(SelectionKind::Point))
        }
        fn line() -> Box<dyn Serializable> {
            Box::new(Selection::new(SelectionKind::Line))
        }
        fn rectangle() -> Box<dyn Serializable> {
            Box::new(Selection::new(SelectionKind::Rectangle))
        }
        match self {
            Self::Point => point,
            Self::Line => line,
            Self::Rectangle => rectangle,
        }
    }
}

static SCHEMA: &[ItemSpec] = &[ItemSpec::new("data", ItemType::DoubleArray)];

/// A group of shapes selected on data, stored as one flat coordinate array.
#[derive(PartialEq, Clone, Debug)]
pub struct Selection {
    kind: SelectionKind,
    data: Vec<f64>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(SelectionKind::Point)
    }
}

impl Selection {
    pub fn new(kind: SelectionKind) -> Self {
        Self { kind, data: vec![] }
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    pub fn shape_size(&self) -> usize {
        self.kind.shape_size()
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.data.len() / self.shape_size()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, i: usize) -> Option<&[f64]> {
        let n = self.shape_size();
        self.data.get(i * n..(i + 1) * n)
    }

    /// Replaces shape `i`, or appends a shape when `i` is the current length.
    pub fn set(&mut self, i: usize, shape: &[f64]) -> Result<()> {
        let n = self.shape_size();
        self.check_shape_len(shape.len(), n)?;
        let len = self.len();
        if i < len {
            self.data[i * n..(i + 1) * n].copy_from_slice(shape);
        } else if i == len {
            self.data.extend_from_slice(shape);
        } else {
            return Err(anyhow!("Shape index {i} is beyond the end {len}"));
        }
        Ok(())
    }

    pub fn delete(&mut self, i: usize) -> Result<()> {
        let n = self.shape_size();
        if i >= self.len() {
            return Err(anyhow!("Shape index {i} is beyond the end {}", self.len()));
        }
        self.data.drain(i * n..(i + 1) * n);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn set_data(&mut self, data: &[f64]) -> Result<()> {
        self.check_shape_len(data.len(), self.shape_size())?;
        self.data = data.to_vec();
        Ok(())
    }

    fn check_shape_len(&self, len: usize, n: usize) -> Result<()> {
        if len % n != 0 {
            return Err(anyhow!(
                "Data length {len} is not a multiple of {n} as {} requires",
                self.kind.type_name()
            ));
        }
        Ok(())
    }
}

impl Serializable for Selection {
    fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    fn n_items(&self) -> usize {
        SCHEMA.len()
    }

    fn itemize<'a>(&'a self, items: &mut WireItems<'a>) {
        items.push("data", WireValue::DoubleArray(Cow::Borrowed(&self.data)));
    }

    fn construct(&mut self, items: Vec<WireItem<'static>>, errors: &mut ErrorList) -> bool {
        let mut its = filter_items(SCHEMA, items, self.type_name(), errors);
        if !its.is_ok() {
            return false;
        }

        let data = its.take_double_array("data").unwrap_or_default();
        let n = self.shape_size();
        if data.len() % n != 0 {
            errors.push(DeserializeError::invalid(format!(
                "Selection data length is {} which is not a multiple of {n} as is expected for {}",
                data.len(),
                self.type_name()
            )));
            return false;
        }
        self.data = data;
        true
    }

    fn duplicate(&self) -> Box<dyn Serializable> {
        Box::new(self.clone())
    }

    fn assign(&mut self, source: &dyn Serializable) -> Result<(), AssignError> {
        match source.downcast_ref::<Selection>() {
            Some(src) if src.kind == self.kind => {
                self.data.clone_from(&src.data);
                Ok(())
            }
            _ => Err(AssignError {
                to_type: self.type_name(),
                from_type: source.type_name(),
            }),
        }
    }
}
