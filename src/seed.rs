//! Fixture movies for local and demo databases.

use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};

use crate::{entities::movie, error::AppResult, validation};

struct Fixture {
    title: &'static str,
    description: &'static str,
    runtime: i32,
    genre: &'static str,
    rating: f64,
    available: bool,
}

const FIXTURES: [Fixture; 10] = [
    Fixture {
        title: "Oppenheimer",
        description: "A história do físico J. Robert Oppenheimer e o desenvolvimento da bomba atômica.",
        runtime: 180,
        genre: "Drama",
        rating: 8.4,
        available: true,
    },
    Fixture {
        title: "Duna: Parte 2",
        description: "Paul Atreides se une a Chani e aos Fremen em uma guerra de vingança.",
        runtime: 166,
        genre: "Ficção Científica",
        rating: 8.6,
        available: true,
    },
    Fixture {
        title: "Pulp Fiction",
        description: "As vidas de dois assassinos, um boxeador e um gângster se entrelaçam.",
        runtime: 154,
        genre: "Crime",
        rating: 8.9,
        available: false,
    },
    Fixture {
        title: "O Iluminado",
        description: "Uma família se isola em um hotel remoto durante o inverno.",
        runtime: 146,
        genre: "Terror",
        rating: 8.4,
        available: false,
    },
    Fixture {
        title: "A Viagem de Chihiro",
        description: "Uma menina de 10 anos vagueia por um mundo governado por deuses e espíritos.",
        runtime: 125,
        genre: "Animação",
        rating: 8.6,
        available: true,
    },
    Fixture {
        title: "Batman: O Cavaleiro das Trevas",
        description: "O Coringa emerge para causar caos em Gotham City.",
        runtime: 152,
        genre: "Ação",
        rating: 9.0,
        available: true,
    },
    Fixture {
        title: "Parasita",
        description: "A ganância e a discriminação de classe ameaçam o relacionamento entre duas famílias.",
        runtime: 132,
        genre: "Suspense",
        rating: 8.5,
        available: true,
    },
    Fixture {
        title: "Interestelar",
        description: "Uma equipe de exploradores viaja através de um buraco de minhoca no espaço.",
        runtime: 169,
        genre: "Ficção Científica",
        rating: 8.7,
        available: true,
    },
    Fixture {
        title: "O Grande Hotel Budapeste",
        description: "As aventuras de um lendário concierge em um famoso hotel europeu.",
        runtime: 99,
        genre: "Comédia",
        rating: 8.1,
        available: true,
    },
    Fixture {
        title: "Mad Max: Estrada da Fúria",
        description: "Em um futuro pós-apocalíptico, uma mulher se rebela contra um governante tirano.",
        runtime: 120,
        genre: "Ação",
        rating: 8.1,
        available: false,
    },
];

/// Inserts the fixtures, skipping titles that already exist. Returns the
/// number of rows inserted.
pub async fn run(db: &DatabaseConnection) -> AppResult<u64> {
    let now = jiff::Timestamp::now().as_millisecond();

    let models = FIXTURES.iter().map(|f| movie::ActiveModel {
        id: Default::default(),
        title: Set(f.title.to_string()),
        title_key: Set(validation::title_key(f.title)),
        description: Set(f.description.to_string()),
        runtime: Set(f.runtime),
        genre: Set(f.genre.to_string()),
        rating: Set(f.rating),
        available: Set(f.available),
        created_at: Set(now),
        updated_at: Set(now),
    });

    let inserted = movie::Entity::insert_many(models)
        .on_conflict(OnConflict::column(movie::Column::TitleKey).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use sea_orm::{EntityTrait, PaginatorTrait};

    use super::*;
    use crate::db;

    #[test]
    fn fixtures_pass_validation() {
        for f in &FIXTURES {
            let input = serde_json::from_value(serde_json::json!({
                "title": f.title,
                "description": f.description,
                "runtime": f.runtime,
                "genre": f.genre,
                "rating": f.rating,
            }))
            .unwrap();
            let movie = validation::validate_new(&input).unwrap();
            assert_eq!(movie.genre, f.genre);
        }
    }

    #[tokio::test]
    async fn seeding_twice_inserts_once() {
        let db = db::connect_in_memory().await.unwrap();
        assert_eq!(run(&db).await.unwrap(), 10);
        assert_eq!(run(&db).await.unwrap(), 0);
        assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 10);
    }
}
