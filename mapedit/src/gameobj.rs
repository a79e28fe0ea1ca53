//! Custom per-element properties the game attaches to map data (things,
//! extra line or sector fields and so on). The game registers the object
//! definitions it knows about, the map loader records values against them,
//! and the game queries the values once the map is built.

use log::debug;

use crate::error::EditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Byte,
    Short,
    Int,
    Fixed,
    Angle,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropValue {
    Byte(u8),
    Short(i16),
    Int(i32),
    /// 16.16 fixed point
    Fixed(i32),
    /// Binary angle
    Angle(u32),
    Float(f32),
}

impl PropValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            PropValue::Byte(_) => ValueType::Byte,
            PropValue::Short(_) => ValueType::Short,
            PropValue::Int(_) => ValueType::Int,
            PropValue::Fixed(_) => ValueType::Fixed,
            PropValue::Angle(_) => ValueType::Angle,
            PropValue::Float(_) => ValueType::Float,
        }
    }

    /// Convert a plain number to a value of the given type. Fixed point
    /// values are scaled, the rest are truncated or wrapped.
    pub fn from_f64(value_type: ValueType, v: f64) -> Self {
        match value_type {
            ValueType::Byte => PropValue::Byte(v as u8),
            ValueType::Short => PropValue::Short(v as i16),
            ValueType::Int => PropValue::Int(v as i32),
            ValueType::Fixed => PropValue::Fixed((v * 65536.0) as i32),
            ValueType::Angle => PropValue::Angle(v as i64 as u32),
            ValueType::Float => PropValue::Float(v as f32),
        }
    }

    pub fn as_f32(&self) -> f32 {
        match *self {
            PropValue::Byte(v) => v as f32,
            PropValue::Short(v) => v as f32,
            PropValue::Int(v) => v as f32,
            PropValue::Fixed(v) => v as f32 / 65536.0,
            PropValue::Angle(v) => v as f32,
            PropValue::Float(v) => v,
        }
    }

    pub fn as_i32(&self) -> i32 {
        match *self {
            PropValue::Byte(v) => v as i32,
            PropValue::Short(v) => v as i32,
            PropValue::Int(v) => v,
            PropValue::Fixed(v) => v >> 16,
            PropValue::Angle(v) => v as i32,
            PropValue::Float(v) => v as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropDef {
    pub name: String,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameObjDef {
    pub name: String,
    pub props: Vec<PropDef>,
}

impl GameObjDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            props: Vec::new(),
        }
    }

    pub fn with_prop(mut self, name: &str, value_type: ValueType) -> Self {
        self.props.push(PropDef {
            name: name.to_owned(),
            value_type,
        });
        self
    }

    /// The property `name` refers to, see `find_prop`
    pub fn prop(&self, name: &str) -> Option<&PropDef> {
        self.find_prop(name).map(|i| &self.props[i])
    }

    /// Property whose name starts with `name`, ignoring case
    fn find_prop(&self, name: &str) -> Option<usize> {
        let len = name.len();
        self.props.iter().position(|p| {
            p.name.len() >= len && p.name.as_bytes()[..len].eq_ignore_ascii_case(name.as_bytes())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameObjValue {
    /// Element number the value belongs to
    pub element: u32,
    pub prop: usize,
    pub value: PropValue,
}

/// The recorded values for one map, grouped per object definition
#[derive(Debug, Default, Clone)]
pub struct GameObjDb {
    defs: Vec<GameObjDef>,
    values: Vec<Vec<GameObjValue>>,
}

impl GameObjDb {
    pub fn new(defs: Vec<GameObjDef>) -> Self {
        let values = defs.iter().map(|_| Vec::new()).collect();
        Self { defs, values }
    }

    pub fn defs(&self) -> &[GameObjDef] {
        &self.defs
    }

    fn def_index(&self, name: &str) -> Option<usize> {
        self.defs
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Record `value` for property `prop_name` of element `element`. A later
    /// value for the same element and property replaces the earlier one.
    pub fn add_value(
        &mut self,
        obj_name: &str,
        element: u32,
        prop_name: &str,
        value: PropValue,
    ) -> Result<(), EditError> {
        let def_idx = self
            .def_index(obj_name)
            .ok_or_else(|| EditError::UnknownObject(obj_name.to_owned()))?;
        let def = &self.defs[def_idx];
        // An empty name is a prefix of every property and picks the first
        let Some(prop) = def.find_prop(prop_name) else {
            debug!("{} has no property \"{}\"", def.name, prop_name);
            return Err(EditError::UnknownProperty {
                object: def.name.clone(),
                property: prop_name.to_owned(),
            });
        };

        let values = &mut self.values[def_idx];
        if let Some(existing) = values
            .iter_mut()
            .find(|v| v.element == element && v.prop == prop)
        {
            existing.value = value;
        } else {
            values.push(GameObjValue {
                element,
                prop,
                value,
            });
        }
        Ok(())
    }

    /// Look up a recorded value. The property name must match in full
    /// (ignoring case).
    pub fn value(&self, obj_name: &str, element: u32, prop_name: &str) -> Option<PropValue> {
        let def_idx = self.def_index(obj_name)?;
        let prop = self.defs[def_idx]
            .props
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(prop_name))?;
        self.values[def_idx]
            .iter()
            .find(|v| v.element == element && v.prop == prop)
            .map(|v| v.value)
    }

    /// Number of distinct elements with at least one value for `obj_name`
    pub fn element_count(&self, obj_name: &str) -> usize {
        let Some(def_idx) = self.def_index(obj_name) else {
            return 0;
        };
        let mut elements: Vec<u32> = self.values[def_idx].iter().map(|v| v.element).collect();
        elements.sort_unstable();
        elements.dedup();
        elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::{GameObjDb, GameObjDef, PropValue, ValueType};
    use crate::error::EditError;

    fn thing_db() -> GameObjDb {
        GameObjDb::new(vec![
            GameObjDef::new("Thing")
                .with_prop("X", ValueType::Short)
                .with_prop("Y", ValueType::Short)
                .with_prop("Angle", ValueType::Angle)
                .with_prop("DoomEdNum", ValueType::Int),
        ])
    }

    #[test]
    fn prefix_matching_property() {
        let mut db = thing_db();
        db.add_value("thing", 0, "doomed", PropValue::Int(3004)).unwrap();
        db.add_value("Thing", 0, "X", PropValue::Short(-64)).unwrap();
        assert_eq!(db.value("Thing", 0, "DoomEdNum"), Some(PropValue::Int(3004)));
        assert_eq!(db.value("Thing", 0, "x").map(|v| v.as_i32()), Some(-64));
        assert_eq!(db.element_count("Thing"), 1);
    }

    #[test]
    fn empty_property_name_is_the_first() {
        let mut db = thing_db();
        db.add_value("Thing", 2, "", PropValue::Short(32)).unwrap();
        assert_eq!(db.value("Thing", 2, "X"), Some(PropValue::Short(32)));
        assert_eq!(db.value("Thing", 2, "Y"), None);
    }

    #[test]
    fn replaces_existing_value() {
        let mut db = thing_db();
        db.add_value("Thing", 4, "Angle", PropValue::Angle(90)).unwrap();
        db.add_value("Thing", 4, "Angle", PropValue::Angle(180)).unwrap();
        assert_eq!(db.value("Thing", 4, "angle"), Some(PropValue::Angle(180)));
    }

    #[test]
    fn unknown_names() {
        let mut db = thing_db();
        assert_eq!(
            db.add_value("Light", 0, "X", PropValue::Int(1)),
            Err(EditError::UnknownObject("Light".to_owned()))
        );
        assert!(matches!(
            db.add_value("Thing", 0, "Height", PropValue::Int(1)),
            Err(EditError::UnknownProperty { .. })
        ));
        assert!(db.is_empty());
    }

    #[test]
    fn fixed_conversion() {
        assert_eq!(PropValue::Fixed(3 << 16).as_f32(), 3.0);
        assert_eq!(PropValue::Fixed(3 << 16).as_i32(), 3);
        assert_eq!(PropValue::Float(2.5).value_type(), ValueType::Float);
        assert_eq!(PropValue::from_f64(ValueType::Fixed, 1.5), PropValue::Fixed(0x18000));
        assert_eq!(PropValue::from_f64(ValueType::Short, -3.7), PropValue::Short(-3));
    }
}
