//! Region group selection.

use hashbrown::HashSet;

use crate::models::Area;

/// Keep only the areas whose group code equals `group_code`
pub fn filter_by_group(areas: Vec<Area>, group_code: &str) -> Vec<Area> {
    areas
        .into_iter()
        .filter(|area| area.group_code == group_code)
        .collect()
}

/// Unique (code, name) pairs in first-seen order
pub fn distinct_areas(areas: &[Area]) -> Vec<(&str, &str)> {
    let mut seen = HashSet::new();
    areas
        .iter()
        .map(|area| (area.code.as_str(), area.name.as_str()))
        .filter(|pair| seen.insert(*pair))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(code: &str, name: &str, group: &str) -> Area {
        Area {
            code: code.to_string(),
            name: name.to_string(),
            group_code: group.to_string(),
            geometry: None,
        }
    }

    #[test]
    fn test_filter_keeps_only_matching_group() {
        let areas = vec![
            area("102011028", "Avoca Beach - Copacabana", "102"),
            area("101021007", "Braidwood", "101"),
            area("102011029", "Box Head - MacMasters Beach", "102"),
            area("1020", "Prefix only", "1020"),
        ];

        let selected = filter_by_group(areas, "102");
        let codes: Vec<&str> = selected.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["102011028", "102011029"]);
    }

    #[test]
    fn test_filter_no_match() {
        let areas = vec![area("101021007", "Braidwood", "101")];
        assert!(filter_by_group(areas, "102").is_empty());
    }

    #[test]
    fn test_distinct_areas_preserves_order() {
        let areas = vec![
            area("102011030", "Calga - Kulnura", "102"),
            area("102011028", "Avoca Beach - Copacabana", "102"),
            area("102011030", "Calga - Kulnura", "102"),
        ];

        assert_eq!(
            distinct_areas(&areas),
            vec![
                ("102011030", "Calga - Kulnura"),
                ("102011028", "Avoca Beach - Copacabana"),
            ]
        );
    }
}
