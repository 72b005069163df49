//! Districts (traffic analysis zones) and district groups.
//!
//! A district owns three disjoint edge lists: sources where its traffic
//! enters the network, sinks where traffic destined for it leaves, and
//! edges of undetermined direction.  Districts are bundled into groups;
//! no candidate route is generated between a source and a sink of the
//! same group.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use odr_core::{DistrictId, EdgeId, GroupId};

use crate::{RouteError, RouteResult};

// ── EdgeRole ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EdgeRole {
    Source,
    Sink,
    Undefined,
}

impl fmt::Display for EdgeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EdgeRole::Source => "source",
            EdgeRole::Sink => "sink",
            EdgeRole::Undefined => "undefined",
        })
    }
}

impl FromStr for EdgeRole {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(EdgeRole::Source),
            "sink" => Ok(EdgeRole::Sink),
            "undefined" | "" => Ok(EdgeRole::Undefined),
            _ => Err(RouteError::Parse(format!("unknown edge role '{s}'"))),
        }
    }
}

// ── District / DistrictGroup ──────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct District {
    pub name: String,
    pub group: GroupId,
    pub sources: Vec<EdgeId>,
    pub sinks: Vec<EdgeId>,
    pub undefined: Vec<EdgeId>,
}

impl District {
    pub fn has_source(&self, edge: EdgeId) -> bool {
        self.sources.contains(&edge)
    }

    pub fn has_sink(&self, edge: EdgeId) -> bool {
        self.sinks.contains(&edge)
    }

    pub fn role_of(&self, edge: EdgeId) -> Option<EdgeRole> {
        if self.has_source(edge) {
            Some(EdgeRole::Source)
        } else if self.has_sink(edge) {
            Some(EdgeRole::Sink)
        } else if self.undefined.contains(&edge) {
            Some(EdgeRole::Undefined)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DistrictGroup {
    pub name: String,
    pub districts: Vec<DistrictId>,
}

// ── DistrictRegistry ──────────────────────────────────────────────────────────

/// Arena of districts and groups.
#[derive(Default)]
pub struct DistrictRegistry {
    districts: Vec<District>,
    groups: Vec<DistrictGroup>,
    district_index: FxHashMap<String, DistrictId>,
    group_index: FxHashMap<String, GroupId>,
}

impl DistrictRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add district `name` to `group`, or to a group of its own when `group`
    /// is `None`.  Re-adding a district returns its id; naming a different
    /// group than before is an error.
    pub fn add_district(&mut self, name: &str, group: Option<&str>) -> RouteResult<DistrictId> {
        if let Some(&id) = self.district_index.get(name) {
            if let Some(g) = group {
                let current = &self.groups[self.districts[id.index()].group.index()].name;
                if current != g {
                    return Err(RouteError::GroupConflict {
                        district: name.to_owned(),
                        first: current.clone(),
                        second: g.to_owned(),
                    });
                }
            }
            return Ok(id);
        }

        let id = DistrictId::from_index(self.districts.len());
        let group = self.group_id(group.unwrap_or(name));
        self.groups[group.index()].districts.push(id);
        self.districts.push(District {
            name: name.to_owned(),
            group,
            sources: Vec::new(),
            sinks: Vec::new(),
            undefined: Vec::new(),
        });
        self.district_index.insert(name.to_owned(), id);
        Ok(id)
    }

    fn group_id(&mut self, name: &str) -> GroupId {
        if let Some(&g) = self.group_index.get(name) {
            return g;
        }
        let g = GroupId::from_index(self.groups.len());
        self.groups.push(DistrictGroup { name: name.to_owned(), districts: Vec::new() });
        self.group_index.insert(name.to_owned(), g);
        g
    }

    /// Attach `edge` to `district` with `role`.  An edge holds one role per
    /// district; repeating the same role is a no-op.
    pub fn add_edge(&mut self, district: DistrictId, edge: EdgeId, role: EdgeRole, edge_name: &str) -> RouteResult<()> {
        let d = &mut self.districts[district.index()];
        match d.role_of(edge) {
            Some(r) if r == role => return Ok(()),
            Some(_) => {
                return Err(RouteError::RoleConflict {
                    district: d.name.clone(),
                    edge: edge_name.to_owned(),
                });
            }
            None => {}
        }
        match role {
            EdgeRole::Source => d.sources.push(edge),
            EdgeRole::Sink => d.sinks.push(edge),
            EdgeRole::Undefined => d.undefined.push(edge),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    #[inline]
    pub fn district(&self, id: DistrictId) -> &District {
        &self.districts[id.index()]
    }

    #[inline]
    pub fn group(&self, id: GroupId) -> &DistrictGroup {
        &self.groups[id.index()]
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn by_name(&self, name: &str) -> Option<DistrictId> {
        self.district_index.get(name).copied()
    }

    /// Like [`by_name`](Self::by_name) but reports the miss.
    pub fn require(&self, name: &str) -> RouteResult<DistrictId> {
        self.by_name(name)
            .ok_or_else(|| RouteError::UnknownDistrict(name.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DistrictId, &District)> + '_ {
        self.districts
            .iter()
            .enumerate()
            .map(|(i, d)| (DistrictId::from_index(i), d))
    }

    /// Group of the first district listing `edge` as a source.
    pub fn source_group(&self, edge: EdgeId) -> Option<GroupId> {
        self.districts.iter().find(|d| d.has_source(edge)).map(|d| d.group)
    }

    /// Group of the first district listing `edge` as a sink.
    pub fn sink_group(&self, edge: EdgeId) -> Option<GroupId> {
        self.districts.iter().find(|d| d.has_sink(edge)).map(|d| d.group)
    }
}
