//! Part Resolution Engine
//!
//! Maps one component to a catalog identifier. Scalar kinds are matched by
//! exact value or interval containment; an interval is narrowed to the value
//! of the entry that fit. Categorical kinds match their tag tuple exactly.

use crate::catalog::{Catalog, ScalarTable};
use crate::graph::{ComponentId, Design, MosfetTags, PartKind};
use crate::parameter::Parameter;

use super::footprint::{PinMap, PinMaps, LED_PINS, MOSFET_PINS};
use super::rules::{select_strategy, Strategy};
use super::{Constraint, ResolveError};

pub struct PartResolver<'c> {
    catalog: &'c Catalog,
}

impl<'c> PartResolver<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Resolve a component to a part identifier.
    ///
    /// `Ok(None)` means no rule claims the component's kind. Pin maps are
    /// written to `pin_maps` before matching, so they are present even when
    /// matching fails.
    pub fn resolve(
        &self,
        design: &mut Design,
        component: ComponentId,
        pin_maps: &mut PinMaps,
    ) -> Result<Option<String>, ResolveError> {
        let kind = design.component(component).kind;
        let Some((rule, strategy)) = select_strategy(&kind) else {
            return Ok(None);
        };
        tracing::trace!("{} claimed by {:?}", design.path(component), rule);

        let part_id = match strategy {
            Strategy::Canonical(part) => self.pick_canonical(design, component, part)?,
            Strategy::Scalar(table) => self.pick_scalar(design, component, table)?,
            Strategy::PinMappedLed => {
                pin_maps.attach(component, PinMap::from_terminals(design, component, &LED_PINS)?);
                self.catalog
                    .led
                    .clone()
                    .ok_or_else(|| ResolveError::MissingCatalogEntry(kind.to_string()))?
            }
            Strategy::Categorical(tags) => {
                pin_maps.attach(
                    component,
                    PinMap::from_terminals(design, component, &MOSFET_PINS)?,
                );
                self.pick_mosfet(design, component, tags)?
            }
        };

        Ok(Some(part_id))
    }

    fn pick_canonical(
        &self,
        design: &Design,
        component: ComponentId,
        part: PartKind,
    ) -> Result<String, ResolveError> {
        self.catalog
            .canonical_part(part)
            .map(str::to_string)
            .ok_or_else(|| {
                ResolveError::MissingCatalogEntry(format!(
                    "{} ({})",
                    part.model(),
                    design.path(component)
                ))
            })
    }

    fn pick_scalar(
        &self,
        design: &mut Design,
        component: ComponentId,
        table: ScalarTable,
    ) -> Result<String, ResolveError> {
        let param = table.param();
        let declared = design
            .param(component, param)
            .ok_or_else(|| ResolveError::MissingParameter {
                component: design.path(component),
                param,
            })?;

        for entry in self.catalog.scalar_table(table) {
            match declared {
                Parameter::Fixed { value } => {
                    if value == entry.value {
                        return Ok(entry.part_id.clone());
                    }
                }
                Parameter::Interval(_) => {
                    if declared.contains(entry.value) {
                        let narrowed = design.narrow_param(component, param, entry.value)?;
                        tracing::debug!(
                            "Narrowed {} of {} from {} to {}",
                            param,
                            design.path(component),
                            declared.display(param.unit()),
                            narrowed.display(param.unit())
                        );
                        return Ok(entry.part_id.clone());
                    }
                }
            }
        }

        Err(ResolveError::NoFittingPart {
            component: design.path(component),
            constraint: Constraint::Parameter {
                param,
                value: declared,
            },
        })
    }

    fn pick_mosfet(
        &self,
        design: &Design,
        component: ComponentId,
        tags: MosfetTags,
    ) -> Result<String, ResolveError> {
        self.catalog
            .mosfets
            .iter()
            .find(|entry| entry.tags == tags)
            .map(|entry| entry.part_id.clone())
            .ok_or_else(|| ResolveError::NoFittingPart {
                component: design.path(component),
                constraint: Constraint::Tags(tags),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;
    use crate::graph::{ChannelType, ComponentKind, CompositeKind, SaturationType};
    use crate::parameter::ParamKind;
    use crate::units::{nano, K};

    fn resistor(design: &mut Design, value: Parameter) -> ComponentId {
        let r = design.add_component(design.root(), "r", ComponentKind::Resistor);
        design.bind_param(r, ParamKind::Resistance, value).unwrap();
        r
    }

    #[test]
    fn test_fixed_resistor_exact_match() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        let r = resistor(&mut design, Parameter::fixed(1.0 * K));

        let mut maps = PinMaps::new();
        let part = PartResolver::new(&catalog).resolve(&mut design, r, &mut maps).unwrap();
        assert_eq!(part.as_deref(), Some("C11702"));
        assert!(maps.is_empty());
    }

    #[test]
    fn test_interval_resistor_narrows() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        let r = resistor(&mut design, Parameter::interval(4000.0, 6000.0).unwrap());

        let part = PartResolver::new(&catalog)
            .resolve(&mut design, r, &mut PinMaps::new())
            .unwrap();
        assert_eq!(part.as_deref(), Some("C226726"));
        assert_eq!(
            design.param(r, ParamKind::Resistance),
            Some(Parameter::fixed(5100.0))
        );
    }

    #[test]
    fn test_unmatched_resistor_fails() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        let r = resistor(&mut design, Parameter::fixed(7.0));

        let err = PartResolver::new(&catalog)
            .resolve(&mut design, r, &mut PinMaps::new())
            .unwrap_err();
        match err {
            ResolveError::NoFittingPart {
                component,
                constraint,
            } => {
                assert_eq!(component, "b.r");
                assert_eq!(
                    constraint,
                    Constraint::Parameter {
                        param: ParamKind::Resistance,
                        value: Parameter::fixed(7.0),
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unmatched_interval_is_left_open() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        let open = Parameter::interval(1.0, 2.0).unwrap();
        let r = resistor(&mut design, open);

        assert!(PartResolver::new(&catalog)
            .resolve(&mut design, r, &mut PinMaps::new())
            .is_err());
        assert_eq!(design.param(r, ParamKind::Resistance), Some(open));
    }

    #[test]
    fn test_first_fit_prefers_earlier_entry() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        // 300 and 5.1k both fit; 300 is listed first
        let r = resistor(&mut design, Parameter::interval(100.0, 6000.0).unwrap());

        let part = PartResolver::new(&catalog)
            .resolve(&mut design, r, &mut PinMaps::new())
            .unwrap();
        assert_eq!(part.as_deref(), Some("C137885"));
        assert_eq!(design.param(r, ParamKind::Resistance), Some(Parameter::fixed(300.0)));
    }

    #[test]
    fn test_unbound_resistor_is_missing_parameter() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        let r = design.add_component(design.root(), "r", ComponentKind::Resistor);

        let err = PartResolver::new(&catalog)
            .resolve(&mut design, r, &mut PinMaps::new())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingParameter { .. }));
    }

    #[test]
    fn test_mosfet_pin_map_and_part() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        let q = design.add_component(
            design.root(),
            "q",
            ComponentKind::mosfet(ChannelType::NChannel, SaturationType::Enhancement),
        );

        let mut maps = PinMaps::new();
        let part = PartResolver::new(&catalog).resolve(&mut design, q, &mut maps).unwrap();
        assert_eq!(part.as_deref(), Some("C8545"));

        let map = maps.get(q).unwrap();
        let pins: Vec<(&str, &str)> = map
            .pins()
            .iter()
            .map(|p| (p.pin.as_str(), p.terminal.as_str()))
            .collect();
        assert_eq!(pins, vec![("2", "source"), ("3", "drain"), ("1", "gate")]);
    }

    #[test]
    fn test_unmatched_mosfet_still_gets_pin_map() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        let q = design.add_component(
            design.root(),
            "q",
            ComponentKind::mosfet(ChannelType::NChannel, SaturationType::Depletion),
        );

        let mut maps = PinMaps::new();
        let err = PartResolver::new(&catalog)
            .resolve(&mut design, q, &mut maps)
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NoFittingPart {
                constraint: Constraint::Tags(_),
                ..
            }
        ));
        assert!(maps.get(q).is_some());
    }

    #[test]
    fn test_led_and_capacitor() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        let led = design.add_component(design.root(), "led", ComponentKind::Led);
        let cap = design.add_component(design.root(), "c", ComponentKind::Capacitor);
        design
            .bind_param(cap, ParamKind::Capacitance, Parameter::fixed(nano(100.0)))
            .unwrap();

        let resolver = PartResolver::new(&catalog);
        let mut maps = PinMaps::new();
        assert_eq!(
            resolver.resolve(&mut design, led, &mut maps).unwrap().as_deref(),
            Some("C84256")
        );
        assert_eq!(maps.get(led).unwrap().terminal("2"), Some("cathode"));
        assert_eq!(
            resolver.resolve(&mut design, cap, &mut maps).unwrap().as_deref(),
            Some("C14663")
        );
    }

    #[test]
    fn test_unclaimed_kinds_resolve_to_none() {
        let catalog = builtin_catalog().unwrap();
        let mut design = Design::new("b");
        let buffer = design.add_component(
            design.root(),
            "buffer",
            ComponentKind::composite(CompositeKind::LevelBuffer),
        );
        let ldo = design.add_component(
            design.root(),
            "ldo",
            ComponentKind::part(PartKind::Me6211c33m5gN),
        );

        let resolver = PartResolver::new(&catalog);
        let mut maps = PinMaps::new();
        assert_eq!(resolver.resolve(&mut design, buffer, &mut maps).unwrap(), None);
        assert_eq!(resolver.resolve(&mut design, ldo, &mut maps).unwrap(), None);
        let root = design.root();
        assert_eq!(resolver.resolve(&mut design, root, &mut maps).unwrap(), None);
    }

    #[test]
    fn test_canonical_missing_from_custom_catalog() {
        let catalog = Catalog::from_json(r#"{"source": "empty", "led": null}"#).unwrap();
        let mut design = Design::new("b");
        let mcu = design.add_component(
            design.root(),
            "mcu",
            ComponentKind::part(PartKind::Esp32C3Mini1),
        );
        let err = PartResolver::new(&catalog)
            .resolve(&mut design, mcu, &mut PinMaps::new())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingCatalogEntry(_)));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let catalog = builtin_catalog().unwrap();
        let mut template = Design::new("b");
        let r = resistor(&mut template, Parameter::interval(500.0, 200_000.0).unwrap());

        let mut outcomes = Vec::new();
        for _ in 0..3 {
            let mut design = template.clone();
            let part = PartResolver::new(&catalog)
                .resolve(&mut design, r, &mut PinMaps::new())
                .unwrap();
            outcomes.push((part, design.param(r, ParamKind::Resistance)));
        }
        assert!(outcomes.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(outcomes[0].0.as_deref(), Some("C226726"));
    }
}
