use crate::checker::dictionary::WordSet;

/// Generate spelling suggestions for a lowercase word, closest first.
pub fn generate(word: &str, words: &WordSet, max_suggestions: usize) -> Vec<String> {
    // Try progressively more expensive operations
    let mut suggestions: Vec<(usize, String)> = Vec::new();
    let push = |suggestions: &mut Vec<(usize, String)>, candidate: String, distance: usize| {
        if candidate != word && !suggestions.iter().any(|(_, s)| *s == candidate) {
            suggestions.push((distance, candidate));
        }
    };

    // 1. Common transformations, one edit away (fast)
    for transform in generate_transformations(word) {
        if words.contains(&transform) {
            push(&mut suggestions, transform, 1);
        }
    }

    // 2. Prefix matching
    if let Some(prefix) = char_prefix(word, 3).or_else(|| char_prefix(word, 2)) {
        for candidate in words.words_with_prefix(prefix) {
            let distance = edit_distance(word, &candidate);
            if distance <= 2 {
                push(&mut suggestions, candidate, distance);
            }
        }
    }

    // 3. First letter only, for errors early in the word
    if suggestions.len() < max_suggestions {
        if let Some(prefix) = char_prefix(word, 1) {
            for candidate in words.words_with_prefix(prefix) {
                if candidate.len().abs_diff(word.len()) > 2 {
                    continue;
                }
                let distance = edit_distance(word, &candidate);
                if distance <= 2 {
                    push(&mut suggestions, candidate, distance);
                }
            }
        }
    }

    // 4. Only do expensive full-set search for very short words
    if suggestions.len() < max_suggestions && word.chars().count() <= 3 {
        for candidate in words.words_near_length(word.len(), 100) {
            let distance = edit_distance(word, &candidate);
            if distance <= 2 {
                push(&mut suggestions, candidate, distance);
            }
        }
    }

    // Stable: transformations stay ahead of prefix matches at equal distance.
    suggestions.sort_by_key(|(distance, _)| *distance);
    suggestions
        .into_iter()
        .map(|(_, word)| word)
        .take(max_suggestions)
        .collect()
}

/// The first `chars` characters of `word`, if it has that many.
fn char_prefix(word: &str, chars: usize) -> Option<&str> {
    match word.char_indices().nth(chars) {
        Some((end, _)) => Some(&word[..end]),
        None if word.chars().count() == chars => Some(word),
        None => None,
    }
}

/// Calculate Levenshtein distance between two strings
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1) // deletion
                .min(current[j] + 1) // insertion
                .min(previous[j] + cost); // substitution
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Generate common transformations of a word
fn generate_transformations(word: &str) -> Vec<String> {
    let mut transformations = Vec::new();
    let chars: Vec<char> = word.chars().collect();

    // Transpositions (swap adjacent)
    for i in 0..chars.len().saturating_sub(1) {
        let mut new_word = chars.clone();
        new_word.swap(i, i + 1);
        transformations.push(new_word.iter().collect());
    }

    // Deletions
    for i in 0..chars.len() {
        let mut new_word = chars.clone();
        new_word.remove(i);
        transformations.push(new_word.iter().collect());
    }

    // Replacements (common typos)
    let common_replacements = [
        ('a', 'e'),
        ('e', 'a'),
        ('e', 'i'),
        ('i', 'e'),
        ('i', 'o'),
        ('o', 'u'),
        ('b', 'v'),
        ('c', 'k'),
        ('c', 's'),
        ('f', 'v'),
        ('g', 'j'),
        ('m', 'n'),
        ('n', 'm'),
        ('s', 'z'),
        ('z', 's'),
        ('t', 'd'),
    ];

    for (i, &ch) in chars.iter().enumerate() {
        for &(from, to) in &common_replacements {
            if ch == from {
                let mut new_word = chars.clone();
                new_word[i] = to;
                transformations.push(new_word.iter().collect());
            }
        }
    }

    // Doubled letters
    for i in 0..chars.len() {
        let mut new_word = chars.clone();
        new_word.insert(i, chars[i]);
        transformations.push(new_word.iter().collect());
    }

    transformations
}
