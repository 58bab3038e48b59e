//! Lignum XML tree reader
//!
//! Only the subset of the Lignum XML format needed for visualisation is read: the axis
//! structure, segment dimensions and physiology, bud positions and kite leaves with their
//! petioles. Unknown elements are skipped.
use crate::tree::{
    Axis, BranchingPoint, BroadLeaf, Bud, Compartment, KiteShape, Morphology, Petiole,
    SegmentKind, Tree, TreeSegment,
};
use crate::types::{Error, Point, Result};
use log::debug;
use nalgebra::Vector3;
use roxmltree::{Document, Node};
use std::fs;
use std::path::Path;

/// Tree type information read from the root of a serialized tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeTypeInfo {
    /// Value of the root `SegmentType` attribute, `Cf` or `Hw`
    pub segment_type: String,
    /// Shape of the first broad leaf, `None` if the tree has no leaves
    pub leaf_shape: Option<String>,
}

impl TreeTypeInfo {
    /// Classify the morphology described by this information
    pub fn morphology(&self) -> Result<Morphology> {
        Morphology::classify(&self.segment_type, self.leaf_shape.as_deref())
    }
}

fn parse_document<'a>(xml: &'a str, context: &str) -> Result<Document<'a>> {
    Document::parse(xml).map_err(|e| Error::container_io(context, e))
}

/// Peek into a serialized tree and read its tree type and leaf shape
pub fn peek(xml: &str) -> Result<TreeTypeInfo> {
    let doc = parse_document(xml, "tree XML")?;
    Ok(peek_document(&doc))
}

fn peek_document(doc: &Document<'_>) -> TreeTypeInfo {
    let root = doc.root_element();
    let segment_type = root.attribute("SegmentType").unwrap_or("").to_string();
    let leaf_shape = if segment_type == "Hw" {
        root.descendants()
            .find(|n| n.has_tag_name("BroadLeaf"))
            .map(|leaf| leaf.attribute("Shape").unwrap_or("").to_string())
    } else {
        None
    };
    TreeTypeInfo {
        segment_type,
        leaf_shape,
    }
}

/// Peek into a serialized tree file
pub fn peek_file(path: &Path) -> Result<TreeTypeInfo> {
    peek(&read_to_string(path)?)
}

/// Read a serialized tree
pub fn read_tree(xml: &str) -> Result<Tree> {
    let doc = parse_document(xml, "tree XML")?;
    let root = doc.root_element();
    let morphology = peek_document(&doc).morphology()?;
    let axis = child(root, "Axis")
        .map(|node| read_axis(node, morphology))
        .transpose()?
        .unwrap_or_default();
    debug!("Read {morphology} with {} root compartments", axis.compartments.len());
    Ok(Tree::new(morphology, axis))
}

/// Read a serialized tree file
pub fn read_tree_file(path: &Path) -> Result<Tree> {
    read_tree(&read_to_string(path)?).map_err(|e| match e {
        Error::ContainerIo { reason, .. } => Error::container_io(path.display().to_string(), reason),
        other => other,
    })
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::container_io(path.display().to_string(), e))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn read_axis(node: Node<'_, '_>, morphology: Morphology) -> Result<Axis> {
    let mut axis = Axis::new();
    for element in node.children().filter(|n| n.is_element()) {
        match element.tag_name().name() {
            "TreeSegment" => axis.push(Compartment::Segment(read_segment(element, morphology)?)),
            "BranchingPoint" => {
                let attributes = attribute_block(element, "BranchingPointAttributes")?;
                axis.push(Compartment::BranchingPoint(BranchingPoint {
                    point: point(attributes, "point")?,
                    direction: direction(attributes)?,
                    axes: element
                        .children()
                        .filter(|n| n.has_tag_name("Axis"))
                        .map(|a| read_axis(a, morphology))
                        .collect::<Result<_>>()?,
                }));
            }
            "Bud" => {
                let attributes = attribute_block(element, "BudAttributes")?;
                axis.push(Compartment::Bud(Bud {
                    point: point(attributes, "point")?,
                    direction: direction(attributes)?,
                }));
            }
            _ => {}
        }
    }
    Ok(axis)
}

fn read_segment(node: Node<'_, '_>, morphology: Morphology) -> Result<TreeSegment> {
    let attributes = attribute_block(node, "TreeSegmentAttributes")?;
    let kind = match morphology {
        Morphology::Coniferous => SegmentKind::Coniferous {
            foliage_radius: scalar(attributes, "Rf")?,
        },
        Morphology::Broadleaved => SegmentKind::Broadleaved {
            leaves: node
                .children()
                .filter(|n| n.has_tag_name("BroadLeaf"))
                .map(read_leaf)
                .collect::<Result<_>>()?,
        },
    };
    Ok(TreeSegment {
        point: point(attributes, "point")?,
        direction: direction(attributes)?,
        length: scalar(attributes, "L")?,
        radius: scalar(attributes, "R")?,
        heartwood_radius: scalar(attributes, "Rh")?,
        foliage_mass: scalar(attributes, "Wf")?,
        qin: scalar(attributes, "Qin")?,
        qabs: scalar(attributes, "Qabs")?,
        photosynthesis: scalar(attributes, "P")?,
        kind,
    })
}

fn read_leaf(node: Node<'_, '_>) -> Result<BroadLeaf> {
    let shape = node.attribute("Shape").unwrap_or("");
    if shape != "Kite" {
        return Err(Error::UnsupportedMorphology(format!(
            "leaf type {shape} not yet supported"
        )));
    }
    let attributes = attribute_block(node, "BroadLeafAttributes")?;
    let kite = child(node, "Kite")
        .ok_or_else(|| Error::container_io("tree XML", "BroadLeaf without Kite element"))?;
    Ok(BroadLeaf {
        shape: KiteShape {
            base: point(kite, "BasePoint")?,
            right: point(kite, "RightPoint")?,
            apex: point(kite, "ApexPoint")?,
            left: point(kite, "LeftPoint")?,
        },
        area: scalar(attributes, "A")?,
        qin: scalar(attributes, "Qin")?,
        qabs: scalar(attributes, "Qabs")?,
        photosynthesis: scalar(attributes, "P")?,
        petiole: Petiole {
            start: point(attributes, "PetioleStart")?,
            end: point(attributes, "PetioleEnd")?,
        },
    })
}

fn attribute_block<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>> {
    child(node, name).ok_or_else(|| {
        Error::container_io(
            "tree XML",
            format!("{} without {name}", node.tag_name().name()),
        )
    })
}

fn text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name).and_then(|n| n.text()).map(str::trim)
}

fn scalar(node: Node<'_, '_>, name: &str) -> Result<f64> {
    match text(node, name) {
        None | Some("") => Ok(0.0),
        Some(s) => s
            .parse()
            .map_err(|e| Error::container_io("tree XML", format!("{name} \"{s}\": {e}"))),
    }
}

fn triple(node: Node<'_, '_>, name: &str) -> Result<[f64; 3]> {
    let s = text(node, name).ok_or_else(|| {
        Error::container_io(
            "tree XML",
            format!("{} without {name}", node.tag_name().name()),
        )
    })?;
    let values = s
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::container_io("tree XML", format!("{name} \"{s}\": {e}")))?;
    values.try_into().map_err(|v: Vec<f64>| {
        Error::container_io(
            "tree XML",
            format!("{name} has {} coordinates, expected 3", v.len()),
        )
    })
}

fn point(node: Node<'_, '_>, name: &str) -> Result<Point> {
    let [x, y, z] = triple(node, name)?;
    Ok(Point::new(x, y, z))
}

fn direction(node: Node<'_, '_>) -> Result<Vector3<f64>> {
    if child(node, "direction").is_none() {
        return Ok(Vector3::z());
    }
    let [x, y, z] = triple(node, "direction")?;
    Ok(Vector3::new(x, y, z))
}

#[cfg(test)]
mod test {
    use super::*;

    const CONIFER: &str = r#"<Tree ObjectIndex="0" SegmentType="Cf">
  <TreeAttributes><age>2</age></TreeAttributes>
  <Axis ObjectIndex="1">
    <TreeSegment ObjectIndex="2">
      <TreeSegmentAttributes>
        <point>0 0 0</point><direction>0 0 1</direction>
        <L>1.0</L><R>0.1</R><Rh>0.05</Rh><Rf>0.3</Rf><Wf>0.2</Wf>
      </TreeSegmentAttributes>
    </TreeSegment>
    <BranchingPoint ObjectIndex="3">
      <BranchingPointAttributes><point>0 0 1</point></BranchingPointAttributes>
      <Axis ObjectIndex="4">
        <Bud ObjectIndex="5"><BudAttributes><point>0.5 0 1</point></BudAttributes></Bud>
      </Axis>
    </BranchingPoint>
    <Bud ObjectIndex="6"><BudAttributes><point>0 0 1</point></BudAttributes></Bud>
  </Axis>
</Tree>"#;

    #[test]
    fn test_peek_conifer() {
        let info = peek(CONIFER).unwrap();
        assert_eq!(info.segment_type, "Cf");
        assert_eq!(info.leaf_shape, None);
        assert_eq!(info.morphology().unwrap(), Morphology::Coniferous);
    }

    #[test]
    fn test_read_conifer() {
        let tree = read_tree(CONIFER).unwrap();
        assert_eq!(tree.morphology(), Morphology::Coniferous);
        assert_eq!(tree.axis().compartments.len(), 3);
        assert_eq!(tree.axis_count(), 2);
        match &tree.axis().compartments[0] {
            Compartment::Segment(s) => {
                assert_eq!(s.length, 1.0);
                assert_eq!(s.foliage_radius(), Some(0.3));
                assert_eq!(s.qin, 0.0);
            }
            _ => panic!("first compartment should be a segment"),
        }
    }

    #[test]
    fn test_peek_unsupported_leaf() {
        let xml = r#"<Tree SegmentType="Hw"><Axis><TreeSegment>
            <BroadLeaf Shape="Ellipse"/></TreeSegment></Axis></Tree>"#;
        let info = peek(xml).unwrap();
        assert_eq!(info.leaf_shape.as_deref(), Some("Ellipse"));
        assert!(matches!(
            info.morphology(),
            Err(Error::UnsupportedMorphology(_))
        ));
        assert!(matches!(
            read_tree(xml),
            Err(Error::UnsupportedMorphology(_))
        ));
    }

    #[test]
    fn test_bad_point() {
        let xml = r#"<Tree SegmentType="Cf"><Axis><Bud><BudAttributes>
            <point>0 1</point></BudAttributes></Bud></Axis></Tree>"#;
        assert!(matches!(read_tree(xml), Err(Error::ContainerIo { .. })));
    }

    #[test]
    fn test_not_xml() {
        assert!(matches!(peek("not a tree"), Err(Error::ContainerIo { .. })));
    }
}
