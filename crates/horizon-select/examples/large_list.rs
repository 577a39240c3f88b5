//! A searchable multi-select over two thousand options.
//!
//! Simulates a user opening the widget, typing a query one keystroke per
//! frame, picking two results and clicking elsewhere. Run with
//! `RUST_LOG=horizon_select=debug` to watch the widget's logs.

use horizon_select::{
    ComboBox, ComboBoxConfig, DropdownBody, Gesture, PointerRegistry, SearchScheduling,
    SelectOption, TriggerContent,
};
use tracing_subscriber::EnvFilter;

fn options() -> Vec<SelectOption> {
    let mut options = vec![
        SelectOption::new("1", "Option 1"),
        SelectOption::new("2", "Option with icon"),
        SelectOption::new("3", "Long Long Option 3"),
        SelectOption::new("4", "Long Long Long Option 4"),
        SelectOption::new("5", "Long Long Long Long Option 5"),
    ];
    options.extend((6..2006).map(|i| SelectOption::new(i.to_string(), format!("Option {i}"))));
    options
}

fn print_frame(frame: usize, combo: &ComboBox) {
    let view = combo.view();
    let search = view
        .dropdown
        .search_box
        .as_ref()
        .map(|search_box| search_box.value.as_str())
        .unwrap_or_default();
    let visible = match &view.dropdown.body {
        DropdownBody::Options(rows) => rows.len(),
        DropdownBody::Empty { .. } => 0,
    };
    println!(
        "frame {frame:>2}: search {search:<12?} effective {:<12?} visible {visible:>4}{}",
        combo.effective_search_text(),
        if combo.is_search_stale() { " (stale)" } else { "" },
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ComboBoxConfig::new(options())
        .with_id("select-1")
        .with_label(Some("Select options:".into()))
        .with_multiple(true)
        .with_search(true)
        .with_search_scheduling(SearchScheduling::Deferred { max_lag_turns: 3 });

    let registry = PointerRegistry::shared();
    let mut combo = ComboBox::new(config).with_outside_pointer_port(registry.clone());
    combo.mount();

    combo.on_change(|selected| {
        let labels: Vec<&str> = selected.iter().map(SelectOption::label).collect();
        println!("selection changed: {labels:?}");
    });

    combo.dispatch(Gesture::TriggerClicked);

    let query = "long option";
    let mut frame = 0;
    for end in 1..=query.len() {
        combo.dispatch(Gesture::SearchInput {
            text: query[..end].to_string(),
        });
        combo.tick();
        print_frame(frame, &combo);
        frame += 1;
    }
    while combo.is_search_stale() {
        combo.tick();
        print_frame(frame, &combo);
        frame += 1;
    }

    let view = combo.view();
    for row in view.dropdown.body.rows() {
        println!("  {}", row.label.to_html());
    }

    let picks: Vec<String> = combo
        .visible_options()
        .iter()
        .take(2)
        .map(|option| option.value.clone())
        .collect();
    for value in picks {
        combo.dispatch(Gesture::OptionClicked { value });
    }

    registry.lock().pointer_pressed(None);
    combo.tick();
    println!("open after outside click: {}", combo.is_open());

    if let TriggerContent::Chips(chips) = combo.view().trigger.content {
        println!("{} chips in the trigger", chips.len());
    }
}
