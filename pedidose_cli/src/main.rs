use clap::{Parser, Subcommand};
use pedidose_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pedidose")]
#[command(about = "Pediatric drug reference and dose calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override dataset file
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and filter the drug list (default)
    List {
        /// Free-text query over names, indications, systems, and more
        #[arg(long, short)]
        query: Option<String>,

        /// Exact medical-system tag (e.g. Infectious_Diseases)
        #[arg(long)]
        system: Option<String>,

        /// Exact drug class
        #[arg(long)]
        class: Option<String>,

        /// Exact route (e.g. PO, IV)
        #[arg(long)]
        route: Option<String>,

        /// Exact dosage form
        #[arg(long)]
        form: Option<String>,

        /// Exact frequency
        #[arg(long)]
        frequency: Option<String>,

        /// Sort key (name, system, class, route)
        #[arg(long)]
        sort: Option<String>,

        /// Show quick-filter facets with live counts
        #[arg(long)]
        facets: bool,
    },

    /// Show the full record for one drug (by id or name)
    Info {
        /// Drug id (drug-N) or exact name
        drug: String,
    },

    /// Calculate a weight-based dose for one drug
    Dose {
        /// Drug id (drug-N) or exact name
        drug: String,

        /// Patient weight, must be within (0, 200) in the chosen unit
        #[arg(long)]
        weight: f64,

        /// Weight unit (kg or lb)
        #[arg(long, default_value = "kg")]
        unit: String,

        /// Patient age, informational only
        #[arg(long)]
        age: Option<f64>,

        /// Age unit (days, months, years)
        #[arg(long)]
        age_unit: Option<String>,
    },

    /// Toggle a drug in the favorites list
    Favorite {
        /// Drug id (drug-N) or exact name
        drug: String,
    },

    /// List favorite drugs
    Favorites,

    /// List recently viewed drugs
    Recent {
        /// Clear the recently viewed list
        #[arg(long)]
        clear: bool,
    },

    /// List the known medical systems
    Systems,
}

fn main() -> Result<()> {
    // Initialize logging
    pedidose_core::logging::init();

    let cli = Cli::parse();

    // Determine data locations
    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir {
        config.data.data_dir = dir;
    }
    if let Some(path) = cli.dataset {
        config.dataset.path = Some(path);
    }

    match cli.command {
        Some(Commands::List {
            query,
            system,
            class,
            route,
            form,
            frequency,
            sort,
            facets,
        }) => cmd_list(
            &config, query, system, class, route, form, frequency, sort, facets,
        ),
        Some(Commands::Info { drug }) => cmd_info(&config, &drug),
        Some(Commands::Dose {
            drug,
            weight,
            unit,
            age,
            age_unit,
        }) => cmd_dose(&config, &drug, weight, &unit, age, age_unit.as_deref()),
        Some(Commands::Favorite { drug }) => cmd_favorite(&config, &drug),
        Some(Commands::Favorites) => cmd_favorites(&config),
        Some(Commands::Recent { clear }) => cmd_recent(&config, clear),
        Some(Commands::Systems) => cmd_systems(),
        None => {
            // Default to listing everything
            cmd_list(&config, None, None, None, None, None, None, None, false)
        }
    }
}

fn load_formulary(config: &Config) -> Result<Formulary> {
    let path = config.dataset_path();
    tracing::debug!("Using dataset at {:?}", path);
    pedidose_core::load_from_path(&path)
}

#[allow(clippy::too_many_arguments)]
fn cmd_list(
    config: &Config,
    query: Option<String>,
    system: Option<String>,
    class: Option<String>,
    route: Option<String>,
    form: Option<String>,
    frequency: Option<String>,
    sort: Option<String>,
    facets: bool,
) -> Result<()> {
    let formulary = load_formulary(config)?;

    // Parse sort key if provided
    let sort_by = sort
        .as_deref()
        .map(|s| match s.to_lowercase().as_str() {
            "name" => SortKey::Name,
            "system" => SortKey::System,
            "class" => SortKey::Class,
            "route" => SortKey::Route,
            other => {
                eprintln!("Unknown sort key: {}. Sorting by name.", other);
                SortKey::Name
            }
        })
        .unwrap_or_default();

    let criteria = FilterCriteria {
        system,
        drug_class: class,
        route,
        dosage_form: form,
        frequency,
        sort_by: Some(sort_by),
    };

    let query = query.unwrap_or_default();
    let results = search::apply(&query, &criteria, formulary.records());

    if facets {
        display_facets(formulary.records());
        println!();
    }

    if results.is_empty() {
        println!("No drugs found matching your search.");
        return Ok(());
    }

    for drug in &results {
        display_record_line(drug);
    }
    println!();
    println!("{} of {} drugs", results.len(), formulary.len());

    Ok(())
}

fn cmd_info(config: &Config, key: &str) -> Result<()> {
    let formulary = load_formulary(config)?;
    let drug = resolve_drug(&formulary, key)?;

    println!("\n  {}  [{}]", drug.name, display_system(&drug.system));
    println!("  {}", drug.drug_class);
    println!();
    println!("  Indication:        {}", drug.indication);
    println!("  Pediatric dose:    {}", drug.pediatric_dose);
    println!("  Maximum dose:      {}", placeholder_if_empty(&drug.max_dose));
    println!("  Form:              {}", drug.dosage_form);
    println!("  Route:             {}", drug.route);
    println!("  Frequency:         {}", drug.frequency);
    println!("  Contraindications: {}", drug.contraindications);
    println!("  Side effects:      {}", drug.side_effects);
    if !drug.special_notes.is_empty() {
        println!("  Special notes:     {}", drug.special_notes);
    }
    println!();

    mark_recently_viewed(config, &drug.id)?;
    Ok(())
}

fn cmd_dose(
    config: &Config,
    key: &str,
    weight: f64,
    unit: &str,
    age: Option<f64>,
    age_unit: Option<&str>,
) -> Result<()> {
    let weight_unit: WeightUnit = unit.parse()?;
    let age_unit = match age_unit {
        Some(u) => Some(u.parse::<AgeUnit>()?),
        None => None,
    };

    // The calculator does not re-validate the weight domain; reject out
    // of range input here at the boundary.
    if !(weight > 0.0 && weight < 200.0) {
        return Err(Error::Patient(format!(
            "weight must be greater than 0 and less than 200 {} (got {})",
            weight_unit, weight
        )));
    }

    let formulary = load_formulary(config)?;
    let drug = resolve_drug(&formulary, key)?;

    let patient = PatientInput {
        weight_value: weight,
        weight_unit,
        age,
        age_unit,
    };

    let result = calculate_dose(drug, &patient);
    display_calculation(drug, &result);

    mark_recently_viewed(config, &drug.id)?;
    Ok(())
}

fn cmd_favorite(config: &Config, key: &str) -> Result<()> {
    let formulary = load_formulary(config)?;
    let drug = resolve_drug(&formulary, key)?;

    let settings = AppSettings::update(&config.settings_path(), |settings| {
        settings.toggle_favorite(&drug.id);
        Ok(())
    })?;

    if settings.is_favorite(&drug.id) {
        println!("★ Added {} to favorites", drug.name);
    } else {
        println!("Removed {} from favorites", drug.name);
    }

    Ok(())
}

fn cmd_favorites(config: &Config) -> Result<()> {
    let formulary = load_formulary(config)?;
    let settings = AppSettings::load(&config.settings_path())?;

    let favorites: Vec<_> = settings
        .favorites
        .iter()
        .filter_map(|id| formulary.get(id))
        .collect();

    if favorites.is_empty() {
        println!("No favorite drugs yet.");
        return Ok(());
    }

    for drug in favorites {
        display_record_line(drug);
    }

    Ok(())
}

fn cmd_recent(config: &Config, clear: bool) -> Result<()> {
    if clear {
        AppSettings::update(&config.settings_path(), |settings| {
            settings.clear_recently_viewed();
            Ok(())
        })?;
        println!("✓ Cleared recently viewed drugs");
        return Ok(());
    }

    let formulary = load_formulary(config)?;
    let settings = AppSettings::load(&config.settings_path())?;

    // Ids whose rows vanished on a reload are skipped, not errors.
    let recent: Vec<_> = settings
        .recent_drugs
        .iter()
        .filter_map(|id| formulary.get(id))
        .collect();

    if recent.is_empty() {
        println!("No recently viewed drugs.");
        return Ok(());
    }

    for drug in recent {
        display_record_line(drug);
    }

    Ok(())
}

fn cmd_systems() -> Result<()> {
    for system in MedicalSystem::ALL {
        println!("{:35} {}", system.display_name(), system.tag());
    }
    Ok(())
}

fn resolve_drug<'a>(formulary: &'a Formulary, key: &str) -> Result<&'a DrugRecord> {
    formulary
        .resolve(key)
        .ok_or_else(|| Error::Other(format!("no drug found for '{}'", key)))
}

fn mark_recently_viewed(config: &Config, drug_id: &str) -> Result<()> {
    AppSettings::update(&config.settings_path(), |settings| {
        settings.mark_recently_viewed(drug_id);
        Ok(())
    })?;
    Ok(())
}

fn display_record_line(drug: &DrugRecord) {
    println!(
        "{:10} {} ({})  [{}]",
        drug.id,
        drug.name,
        drug.drug_class,
        display_system(&drug.system)
    );
    println!(
        "           {} | Route: {} | Form: {} | Frequency: {}",
        drug.indication, drug.route, drug.dosage_form, drug.frequency
    );
}

fn display_facets(records: &[DrugRecord]) {
    let facets = quick_filters(records);
    if facets.is_empty() {
        println!("No quick filters available.");
        return;
    }

    println!("Quick filters:");
    for facet in facets {
        println!("  {} ({})", facet.label, facet.count);
    }
}

fn display_calculation(drug: &DrugRecord, result: &DoseCalculationResult) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  CALCULATED DOSE");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", result.drug_name);
    println!(
        "  Patient weight: {} {}",
        result.patient_weight, result.patient_weight_unit
    );
    println!();
    println!(
        "  → {:.2} {} per dose",
        result.computed_dose, result.dose_unit
    );
    println!("  → Frequency: {}", result.frequency);
    println!(
        "  → Maximum dose: {}",
        placeholder_if_empty(&result.max_dose)
    );

    if result.computed_dose == 0.0 {
        println!();
        println!("  No per-kilogram rule could be read from the dosing text.");
        println!("  Refer to: {}", drug.pediatric_dose);
    }

    if !result.warnings.is_empty() {
        println!();
        for warning in &result.warnings {
            println!("  ⚠ {}", warning);
        }
    }

    println!();
}

fn display_system(tag: &str) -> String {
    match MedicalSystem::from_tag(tag) {
        Some(system) => system.display_name(),
        None => tag.replace('_', " "),
    }
}

fn placeholder_if_empty(text: &str) -> &str {
    if text.trim().is_empty() {
        "Not specified"
    } else {
        text
    }
}
