//! The TOML map description read by `mapc`.
//!
//! Elements are listed in build order. References between them use the
//! 1-based build index, with `0` meaning "none".
//!
//! ```toml
//! name = "MAP01"
//!
//! [[vertexes]]
//! x = 0.0
//! y = 0.0
//!
//! [[sectors]]
//! light = 0.75
//! planes = [{ height = 0.0 }, { height = 128.0, normal = [0.0, 0.0, -1.0] }]
//!
//! [[sidedefs]]
//! sector = 1
//!
//! [[linedefs]]
//! v1 = 1
//! v2 = 2
//! front = 1
//! ```

use std::error::Error;

use glam::{Vec2, Vec3, Vec4};
use log::{debug, warn};
use mapedit::{
    GameObjDef, LineId, MapEditor, MaterialId, PropValue, SectorId, SideId, Surface, ValueType,
    VertexId,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MapDescription {
    pub name: Option<String>,
    pub object_defs: Vec<ObjectDefDesc>,
    pub vertexes: Vec<VertexDesc>,
    pub sectors: Vec<SectorDesc>,
    pub sidedefs: Vec<SideDesc>,
    pub linedefs: Vec<LineDesc>,
    pub polyobjs: Vec<PolyobjDesc>,
    pub properties: Vec<PropertyDesc>,
}

#[derive(Debug, Deserialize)]
pub struct VertexDesc {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SurfaceDesc {
    /// 0 for no material
    pub material: u32,
    pub offset: [f32; 2],
    pub rgba: [f32; 4],
}

impl Default for SurfaceDesc {
    fn default() -> Self {
        Self {
            material: 0,
            offset: [0.0; 2],
            rgba: [1.0; 4],
        }
    }
}

impl SurfaceDesc {
    fn material(&self) -> Option<MaterialId> {
        (self.material != 0).then_some(MaterialId(self.material))
    }

    fn to_surface(&self) -> Surface {
        Surface::new(
            self.material(),
            Vec2::from_array(self.offset),
            Vec4::from_array(self.rgba),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlaneDesc {
    pub height: f32,
    pub normal: [f32; 3],
    #[serde(flatten)]
    pub surface: SurfaceDesc,
}

impl Default for PlaneDesc {
    fn default() -> Self {
        Self {
            height: 0.0,
            normal: [0.0, 0.0, 1.0],
            surface: SurfaceDesc::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SectorDesc {
    pub light: f32,
    pub rgb: [f32; 3],
    pub planes: Vec<PlaneDesc>,
}

impl Default for SectorDesc {
    fn default() -> Self {
        Self {
            light: 1.0,
            rgb: [1.0; 3],
            planes: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SideDesc {
    pub sector: u32,
    pub flags: i16,
    pub top: SurfaceDesc,
    pub middle: SurfaceDesc,
    pub bottom: SurfaceDesc,
}

#[derive(Debug, Deserialize)]
pub struct LineDesc {
    pub v1: u32,
    pub v2: u32,
    #[serde(default)]
    pub front: u32,
    #[serde(default)]
    pub back: u32,
    #[serde(default)]
    pub flags: u32,
}

#[derive(Debug, Deserialize)]
pub struct PolyobjDesc {
    pub lines: Vec<u32>,
    #[serde(default)]
    pub tag: i32,
    #[serde(default)]
    pub seq_type: i32,
    pub anchor: [f64; 2],
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    Byte,
    Short,
    Int,
    Fixed,
    Angle,
    Float,
}

impl From<PropKind> for ValueType {
    fn from(k: PropKind) -> Self {
        match k {
            PropKind::Byte => ValueType::Byte,
            PropKind::Short => ValueType::Short,
            PropKind::Int => ValueType::Int,
            PropKind::Fixed => ValueType::Fixed,
            PropKind::Angle => ValueType::Angle,
            PropKind::Float => ValueType::Float,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PropDefDesc {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropKind,
}

#[derive(Debug, Deserialize)]
pub struct ObjectDefDesc {
    pub name: String,
    pub props: Vec<PropDefDesc>,
}

#[derive(Debug, Deserialize)]
pub struct PropertyDesc {
    pub object: String,
    pub element: u32,
    pub property: String,
    pub value: f64,
}

fn required<T>(id: Option<T>, what: &str, owner: usize) -> Result<T, Box<dyn Error>> {
    id.ok_or_else(|| format!("{what} of element {} may not be 0", owner + 1).into())
}

impl MapDescription {
    /// Game object definitions declared by the description
    pub fn game_obj_defs(&self) -> Vec<GameObjDef> {
        self.object_defs
            .iter()
            .map(|d| {
                d.props
                    .iter()
                    .fold(GameObjDef::new(&d.name), |def, p| def.with_prop(&p.name, p.kind.into()))
            })
            .collect()
    }

    /// Feed every element through `editor`, which must be editing. The first
    /// element the editor rejects stops the load. Properties the editor does
    /// not know about are only warned about.
    pub fn apply(&self, editor: &mut MapEditor) -> Result<(), Box<dyn Error>> {
        if !self.vertexes.is_empty() {
            let positions: Vec<(f64, f64)> = self.vertexes.iter().map(|v| (v.x, v.y)).collect();
            editor.vertex_create_many(&positions)?;
        }

        for sector in &self.sectors {
            let [r, g, b] = sector.rgb;
            let id = editor.sector_create(sector.light, r, g, b)?;
            for plane in &sector.planes {
                editor.plane_create(
                    id,
                    plane.height,
                    plane.surface.material(),
                    Vec2::from_array(plane.surface.offset),
                    Vec4::from_array(plane.surface.rgba),
                    Vec3::from_array(plane.normal),
                )?;
            }
        }

        for side in &self.sidedefs {
            editor.sidedef_create(
                SectorId::new(side.sector),
                side.flags,
                side.top.to_surface(),
                side.middle.to_surface(),
                side.bottom.to_surface(),
            )?;
        }

        for (i, line) in self.linedefs.iter().enumerate() {
            editor.linedef_create(
                required(VertexId::new(line.v1), "v1", i)?,
                required(VertexId::new(line.v2), "v2", i)?,
                SideId::new(line.front),
                SideId::new(line.back),
                line.flags,
            )?;
        }

        for (i, po) in self.polyobjs.iter().enumerate() {
            let lines = po
                .lines
                .iter()
                .map(|&l| required(LineId::new(l), "polyobj line", i))
                .collect::<Result<Vec<_>, _>>()?;
            editor.polyobj_create(&lines, po.tag, po.seq_type, po.anchor[0], po.anchor[1])?;
        }

        let defs = self.game_obj_defs();
        for prop in &self.properties {
            let value_type = defs
                .iter()
                .find(|d| d.name.eq_ignore_ascii_case(&prop.object))
                .and_then(|d| d.prop(&prop.property))
                .map(|p| p.value_type)
                .unwrap_or(ValueType::Float);
            let value = PropValue::from_f64(value_type, prop.value);
            if let Err(e) =
                editor.game_obj_property(&prop.object, prop.element, &prop.property, value)
            {
                warn!("Skipping property {}.{}: {}", prop.object, prop.property, e);
            }
        }

        debug!(
            "Loaded {} vertexes, {} sectors, {} sidedefs, {} linedefs, {} polyobjs",
            self.vertexes.len(),
            self.sectors.len(),
            self.sidedefs.len(),
            self.linedefs.len(),
            self.polyobjs.len()
        );
        Ok(())
    }
}
