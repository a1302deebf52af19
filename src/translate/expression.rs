//! Class expressions, object property expressions and data ranges.

use crate::model::{EdgeLabel, NodeLabel};
use crate::owl::{
    ClassExpression, DataProperty, DataRange, Entity, FacetRestriction, ObjectPropertyExpression,
    OwlObject,
};
use crate::Result;

use super::{cardinality, require_operands, Builder, Translation, Translator};

impl Translator<'_> {
    pub fn translate_class_expression(&self, ce: &ClassExpression) -> Result<Translation> {
        use ClassExpression as CE;

        let label = class_expression_label(ce);
        let open = || {
            self.private_node(label)
                .map(|node| Builder::new(OwlObject::ClassExpression(ce.clone()), node))
        };

        let builder = match ce {
            CE::Class(class) => return self.translate_entity(&Entity::Class(class.clone())),
            CE::ObjectIntersectionOf(operands) | CE::ObjectUnionOf(operands) => {
                require_operands(label.as_str(), operands.len(), 2)?;
                open()?.children(EdgeLabel::ClassExpression, self.class_expressions(operands)?)
            }
            CE::ObjectComplementOf(operand) => {
                open()?.child(EdgeLabel::ClassExpression, self.translate_class_expression(operand)?)
            }
            CE::ObjectOneOf(individuals) => {
                require_operands(label.as_str(), individuals.len(), 1)?;
                let builder = open()?;
                let nested = individuals
                    .iter()
                    .map(|i| self.translate_individual(i))
                    .collect::<Result<Vec<_>>>()?;
                builder.children(EdgeLabel::Individual, nested)
            }
            CE::ObjectSomeValuesFrom { property, filler }
            | CE::ObjectAllValuesFrom { property, filler } => open()?
                .child(EdgeLabel::ObjectPropertyExpression, self.translate_object_property_expression(property)?)
                .child(EdgeLabel::ClassExpression, self.translate_class_expression(filler)?),
            CE::ObjectHasValue { property, individual } => open()?
                .child(EdgeLabel::ObjectPropertyExpression, self.translate_object_property_expression(property)?)
                .child(EdgeLabel::Individual, self.translate_individual(individual)?),
            CE::ObjectHasSelf(property) => open()?
                .child(EdgeLabel::ObjectPropertyExpression, self.translate_object_property_expression(property)?),
            CE::ObjectMinCardinality { cardinality: n, property, filler }
            | CE::ObjectMaxCardinality { cardinality: n, property, filler }
            | CE::ObjectExactCardinality { cardinality: n, property, filler } => {
                let mut builder = open()?;
                builder.main_node.properties.insert("cardinality".into(), cardinality(*n));
                builder
                    .child(EdgeLabel::ObjectPropertyExpression, self.translate_object_property_expression(property)?)
                    .child(EdgeLabel::ClassExpression, self.translate_class_expression(filler)?)
            }
            CE::DataSomeValuesFrom { property, range } | CE::DataAllValuesFrom { property, range } => open()?
                .child(EdgeLabel::DataPropertyExpression, self.translate_data_property(property)?)
                .child(EdgeLabel::DataRange, self.translate_data_range(range)?),
            CE::DataHasValue { property, value } => open()?
                .child(EdgeLabel::DataPropertyExpression, self.translate_data_property(property)?)
                .child(EdgeLabel::Literal, self.translate_literal(value)?),
            CE::DataMinCardinality { cardinality: n, property, range }
            | CE::DataMaxCardinality { cardinality: n, property, range }
            | CE::DataExactCardinality { cardinality: n, property, range } => {
                let mut builder = open()?;
                builder.main_node.properties.insert("cardinality".into(), cardinality(*n));
                builder
                    .child(EdgeLabel::DataPropertyExpression, self.translate_data_property(property)?)
                    .child(EdgeLabel::DataRange, self.translate_data_range(range)?)
            }
        };
        Ok(builder.build())
    }

    pub fn translate_object_property_expression(&self, ope: &ObjectPropertyExpression) -> Result<Translation> {
        match ope {
            ObjectPropertyExpression::ObjectProperty(p) => {
                self.translate_entity(&Entity::ObjectProperty(p.clone()))
            }
            ObjectPropertyExpression::InverseOf(p) => Ok(Builder::new(
                OwlObject::ObjectPropertyExpression(ope.clone()),
                self.private_node(NodeLabel::ObjectInverseOf)?,
            )
            .child(EdgeLabel::ObjectProperty, self.translate_entity(&Entity::ObjectProperty(p.clone()))?)
            .build()),
        }
    }

    pub fn translate_data_range(&self, range: &DataRange) -> Result<Translation> {
        let label = data_range_label(range);
        let open = || {
            self.private_node(label)
                .map(|node| Builder::new(OwlObject::DataRange(range.clone()), node))
        };

        let builder = match range {
            DataRange::Datatype(dt) => return self.translate_entity(&Entity::Datatype(dt.clone())),
            DataRange::DataIntersectionOf(operands) | DataRange::DataUnionOf(operands) => {
                require_operands(label.as_str(), operands.len(), 2)?;
                let builder = open()?;
                let nested = operands
                    .iter()
                    .map(|r| self.translate_data_range(r))
                    .collect::<Result<Vec<_>>>()?;
                builder.children(EdgeLabel::DataRange, nested)
            }
            DataRange::DataComplementOf(operand) => {
                open()?.child(EdgeLabel::DataRange, self.translate_data_range(operand)?)
            }
            DataRange::DataOneOf(literals) => {
                require_operands(label.as_str(), literals.len(), 1)?;
                let builder = open()?;
                let nested = literals
                    .iter()
                    .map(|l| self.translate_literal(l))
                    .collect::<Result<Vec<_>>>()?;
                builder.children(EdgeLabel::Literal, nested)
            }
            DataRange::DatatypeRestriction { datatype, restrictions } => {
                require_operands(label.as_str(), restrictions.len(), 1)?;
                let builder = open()?;
                let nested = restrictions
                    .iter()
                    .map(|fr| self.translate_facet_restriction(fr))
                    .collect::<Result<Vec<_>>>()?;
                builder
                    .child(EdgeLabel::Datatype, self.translate_entity(&Entity::Datatype(datatype.clone()))?)
                    .children(EdgeLabel::FacetRestriction, nested)
            }
        };
        Ok(builder.build())
    }

    pub fn translate_facet_restriction(&self, fr: &FacetRestriction) -> Result<Translation> {
        Ok(Builder::new(
            OwlObject::FacetRestriction(fr.clone()),
            self.private_node(NodeLabel::FacetRestriction)?,
        )
        .child(EdgeLabel::ConstrainingFacet, self.translate_iri(&fr.facet)?)
        .child(EdgeLabel::RestrictionValue, self.translate_literal(&fr.value)?)
        .build())
    }

    pub(crate) fn class_expressions<'a>(
        &self,
        operands: impl IntoIterator<Item = &'a ClassExpression>,
    ) -> Result<Vec<Translation>> {
        operands.into_iter().map(|ce| self.translate_class_expression(ce)).collect()
    }

    pub(crate) fn object_property_expressions<'a>(
        &self,
        operands: impl IntoIterator<Item = &'a ObjectPropertyExpression>,
    ) -> Result<Vec<Translation>> {
        operands
            .into_iter()
            .map(|ope| self.translate_object_property_expression(ope))
            .collect()
    }

    pub(crate) fn data_properties<'a>(
        &self,
        operands: impl IntoIterator<Item = &'a DataProperty>,
    ) -> Result<Vec<Translation>> {
        operands.into_iter().map(|dp| self.translate_data_property(dp)).collect()
    }
}

fn class_expression_label(ce: &ClassExpression) -> NodeLabel {
    use ClassExpression as CE;
    match ce {
        CE::Class(_) => NodeLabel::Class,
        CE::ObjectIntersectionOf(_) => NodeLabel::ObjectIntersectionOf,
        CE::ObjectUnionOf(_) => NodeLabel::ObjectUnionOf,
        CE::ObjectComplementOf(_) => NodeLabel::ObjectComplementOf,
        CE::ObjectOneOf(_) => NodeLabel::ObjectOneOf,
        CE::ObjectSomeValuesFrom { .. } => NodeLabel::ObjectSomeValuesFrom,
        CE::ObjectAllValuesFrom { .. } => NodeLabel::ObjectAllValuesFrom,
        CE::ObjectHasValue { .. } => NodeLabel::ObjectHasValue,
        CE::ObjectHasSelf(_) => NodeLabel::ObjectHasSelf,
        CE::ObjectMinCardinality { .. } => NodeLabel::ObjectMinCardinality,
        CE::ObjectMaxCardinality { .. } => NodeLabel::ObjectMaxCardinality,
        CE::ObjectExactCardinality { .. } => NodeLabel::ObjectExactCardinality,
        CE::DataSomeValuesFrom { .. } => NodeLabel::DataSomeValuesFrom,
        CE::DataAllValuesFrom { .. } => NodeLabel::DataAllValuesFrom,
        CE::DataHasValue { .. } => NodeLabel::DataHasValue,
        CE::DataMinCardinality { .. } => NodeLabel::DataMinCardinality,
        CE::DataMaxCardinality { .. } => NodeLabel::DataMaxCardinality,
        CE::DataExactCardinality { .. } => NodeLabel::DataExactCardinality,
    }
}

fn data_range_label(range: &DataRange) -> NodeLabel {
    match range {
        DataRange::Datatype(_) => NodeLabel::Datatype,
        DataRange::DataIntersectionOf(_) => NodeLabel::DataIntersectionOf,
        DataRange::DataUnionOf(_) => NodeLabel::DataUnionOf,
        DataRange::DataComplementOf(_) => NodeLabel::DataComplementOf,
        DataRange::DataOneOf(_) => NodeLabel::DataOneOf,
        DataRange::DatatypeRestriction { .. } => NodeLabel::DatatypeRestriction,
    }
}
