//! Shared fixtures for the integration tests
//!
//! Public-domain English prose with periods, dashes and digits removed, so
//! every char is one the scorer accepts.

/// Opening of *A Tale of Two Cities* (Dickens, 1859), lightly adapted
#[allow(dead_code)]
pub const TALE: &str = concat!(
    "It was the best of times, it was the worst of times, it was the age of wisdom, it was the age of foolishness, ",
    "it was the epoch of belief, it was the epoch of incredulity, it was the season of Light, it was the season of Darkness, ",
    "it was the spring of hope, it was the winter of despair, we had everything before us, we had nothing before us, ",
    "we were all going direct to Heaven, we were all going direct the other way; in short, the period was so far like ",
    "the present period, that some of its noisiest authorities insisted on its being received, for good or for evil, ",
    "in the superlative degree of comparison only ",
    "There were a king with a large jaw and a queen with a plain face, on the throne of England; there were a king with ",
    "a large jaw and a queen with a fair face, on the throne of France ",
    "In both countries it was clearer than crystal to the lords of the State preserves of loaves and fishes, that things ",
    "in general were settled for ever ",
    "It was the year of Our Lord one thousand seven hundred and seventy five ",
    "Spiritual revelations were conceded to England at that favoured period, as at this ",
    "France, less favoured on the whole as to matters spiritual than her sister of the shield and trident, rolled with ",
    "exceeding smoothness down hill, making paper money and spending it ",
    "Under the guidance of her Christian pastors, she entertained herself, besides, with such humane achievements as ",
    "sentencing a youth to have his hands cut off, his tongue torn out with pincers, and his body burned alive, because ",
    "he had not kneeled down in the rain to do honour to a dirty procession of monks which passed within his view, at a ",
    "distance of some fifty or sixty yards",
);

/// The Gettysburg Address (Lincoln, 1863)
#[allow(dead_code)]
pub const GETTYSBURG: &str = concat!(
    "Four score and seven years ago our fathers brought forth on this continent, a new nation, conceived in Liberty, ",
    "and dedicated to the proposition that all men are created equal ",
    "Now we are engaged in a great civil war, testing whether that nation, or any nation so conceived and so dedicated, ",
    "can long endure We are met on a great battlefield of that war We have come to dedicate a portion of that field, ",
    "as a final resting place for those who here gave their lives that that nation might live It is altogether fitting ",
    "and proper that we should do this ",
    "But, in a larger sense, we can not dedicate, we can not consecrate, we can not hallow this ground The brave men, ",
    "living and dead, who struggled here, have consecrated it, far above our poor power to add or detract The world ",
    "will little note, nor long remember what we say here, but it can never forget what they did here It is for us the ",
    "living, rather, to be dedicated here to the unfinished work which they who fought here have thus far so nobly ",
    "advanced It is rather for us to be here dedicated to the great task remaining before us, that from these honored ",
    "dead we take increased devotion to that cause for which they gave the last full measure of devotion, that we here ",
    "highly resolve that these dead shall not have died in vain, that this nation, under God, shall have a new birth of ",
    "freedom, and that government of the people, by the people, for the people, shall not perish from the earth",
);
