// src/models/category.rs
// DOCUMENTATION: Category registry
// PURPOSE: Fixed, ordered taxonomy of the guide. `id` is the routing key,
// `title` is matched verbatim against the remote `category` field.

use serde::Serialize;

use crate::services::slug::normalize;

/// A guide category defined at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Stable slug used in routes and as the cache key
    pub id: &'static str,

    /// Display name, also the value stored in each location's `category` field
    pub title: &'static str,

    /// Short tagline shown under the title
    pub description: &'static str,

    /// Gradient tag for the card background
    pub color: &'static str,

    /// Icon tag resolved by the front-end
    pub icon: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "restaurantes",
        title: "Restaurantes e Lanchonetes",
        description: "Sabores únicos da região",
        color: "from-orange-400 to-red-500",
        icon: "utensils-crossed",
    },
    Category {
        id: "pontos-turisticos",
        title: "Pontos Turísticos",
        description: "Lugares imperdíveis",
        color: "from-blue-400 to-purple-500",
        icon: "map-pin",
    },
    Category {
        id: "trilhas",
        title: "Trilhas",
        description: "Aventuras na natureza",
        color: "from-green-400 to-emerald-500",
        icon: "mountain",
    },
    Category {
        id: "academias",
        title: "Academias",
        description: "Mantenha-se ativo",
        color: "from-red-400 to-pink-500",
        icon: "dumbbell",
    },
    Category {
        id: "escolas",
        title: "Escolas",
        description: "Educação de qualidade",
        color: "from-indigo-400 to-blue-500",
        icon: "graduation-cap",
    },
    Category {
        id: "supermercados",
        title: "Supermercados",
        description: "Tudo que você precisa",
        color: "from-yellow-400 to-orange-500",
        icon: "shopping-cart",
    },
    Category {
        id: "transporte",
        title: "Transporte Público",
        description: "Mobilidade urbana",
        color: "from-cyan-400 to-blue-500",
        icon: "bus",
    },
    Category {
        id: "hospedagens",
        title: "Hospedagens",
        description: "Conforto e acolhimento",
        color: "from-purple-400 to-pink-500",
        icon: "hotel",
    },
    Category {
        id: "eventos",
        title: "Eventos Locais",
        description: "Cultura e entretenimento",
        color: "from-rose-400 to-red-500",
        icon: "calendar",
    },
    Category {
        id: "feiras",
        title: "Feiras e Mercados",
        description: "Produtos locais frescos",
        color: "from-amber-400 to-yellow-500",
        icon: "store",
    },
    Category {
        id: "espacos-culturais",
        title: "Espaços Culturais",
        description: "Arte e história local",
        color: "from-violet-400 to-purple-500",
        icon: "building",
    },
    Category {
        id: "praias",
        title: "Praias e Lagoas",
        description: "Paraíso natural",
        color: "from-teal-400 to-cyan-500",
        icon: "waves",
    },
];

impl Category {
    /// Whether a remote `category` label names this category. The exact
    /// title is checked first; labels that only differ by case, accents or
    /// spacing are accepted when they normalize to the id.
    pub fn matches_label(&self, label: &str) -> bool {
        label == self.title || normalize(label) == self.id
    }
}

/// All categories in display order
pub fn all_categories() -> &'static [Category] {
    CATEGORIES
}

/// Look up a category by its routing slug. Only exact ids match.
pub fn find_category(slug: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == slug)
}
